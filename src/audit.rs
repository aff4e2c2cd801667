// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Attestation Audit
//!
//! The ledger records counterpart digests on trust. An audit replays the
//! counterpart's full ledger and checks every digest it reported against the
//! digests of that ledger's prefixes.
//!
//! # Outcomes per signature line
//! - `Attested`: some prefix of the counterpart ledger, ending on a line
//!   boundary, hashes to the recorded digest and that prefix ends with the
//!   same transaction line the local ledger signed for.
//! - `Diverged`: the digest matches a prefix but the transaction that prefix
//!   ends with is not the one the local ledger recorded.
//! - `Unmatched`: no prefix hashes to the recorded digest (forged, stale, or
//!   the counterpart ledger was altered).

use crate::digest::{CumulativeHasher, Digest, DigestAlgorithm};
use crate::entry::{lines, parse_entries, LedgerEntry};
use crate::signature::Signature;
use std::collections::HashMap;

/// Digest after every line boundary of `content`, keyed by 1-based line number.
///
/// An unterminated trailing fragment ends on no boundary and is skipped.
pub fn prefix_digests(algorithm: DigestAlgorithm, content: &[u8]) -> Vec<(usize, Digest)> {
    let all: Vec<&[u8]> = lines(content).collect();
    let complete = if content.ends_with(b"\n") {
        all.len()
    } else {
        all.len().saturating_sub(1)
    };

    let mut hasher = CumulativeHasher::new(algorithm);
    let mut out = Vec::with_capacity(complete);
    for (i, line) in all.into_iter().take(complete).enumerate() {
        hasher.update(line);
        hasher.update(b"\n");
        out.push((i + 1, hasher.snapshot()));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttestationStatus {
    Attested { counterpart_line: usize },
    Diverged { counterpart_line: usize },
    Unmatched,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attestation {
    /// Line of the signature in the local ledger.
    pub line: usize,
    pub signature: Signature,
    pub status: AttestationStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditReport {
    pub attestations: Vec<Attestation>,
}

impl AuditReport {
    /// True when every attestation checked out. An empty report is clean.
    pub fn is_clean(&self) -> bool {
        self.attestations
            .iter()
            .all(|a| matches!(a.status, AttestationStatus::Attested { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &Attestation> {
        self.attestations
            .iter()
            .filter(|a| !matches!(a.status, AttestationStatus::Attested { .. }))
    }
}

/// Check every signature authored by `counterpart` in `local` against the
/// counterpart's ledger content.
pub fn audit(
    local: &[u8],
    counterpart: &str,
    counterpart_content: &[u8],
    algorithm: DigestAlgorithm,
) -> AuditReport {
    let by_digest: HashMap<Digest, usize> = prefix_digests(algorithm, counterpart_content)
        .into_iter()
        .map(|(line, digest)| (digest, line))
        .collect();
    let counterpart_lines: Vec<&[u8]> = lines(counterpart_content).collect();

    let mut last_transaction: Option<Vec<u8>> = None;
    let mut attestations = Vec::new();

    for (line, entry) in parse_entries(local) {
        match entry {
            LedgerEntry::Transaction(tx) => {
                last_transaction = Some(tx.as_bytes().to_vec());
            }
            LedgerEntry::Signature(signature) if signature.author == counterpart => {
                let status = match by_digest.get(&signature.digest) {
                    None => AttestationStatus::Unmatched,
                    Some(&counterpart_line) => {
                        let attested = counterpart_lines.get(counterpart_line - 1).copied();
                        if attested.is_some() && attested == last_transaction.as_deref() {
                            AttestationStatus::Attested { counterpart_line }
                        } else {
                            AttestationStatus::Diverged { counterpart_line }
                        }
                    }
                };
                if status == AttestationStatus::Unmatched {
                    tracing::warn!(line, author = counterpart, digest = %signature.digest, "Attestation has no matching prefix");
                }
                attestations.push(Attestation {
                    line,
                    signature,
                    status,
                });
            }
            _ => {}
        }
    }

    tracing::debug!(
        counterpart,
        checked = attestations.len(),
        "Audit finished"
    );
    AuditReport { attestations }
}
