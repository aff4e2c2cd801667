// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Cumulative Digest
//!
//! Every attestation in a ledger is the hash of the *entire* ledger content at
//! the moment it was produced. There is no per-record hash and no Merkle
//! structure: whoever holds the full log can recompute the same 32 bytes.
//!
//! # Guarantee
//! Same bytes → Same digest. Any change to any historical byte changes every
//! digest computed afterwards.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::str::FromStr;

/// Hash function used for the cumulative digest.
///
/// SHA-256 is the default, so digests match ledgers and counterparts that
/// never configured an algorithm. BLAKE3 is opt-in and both parties of a
/// ledger pair must agree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Blake3,
    #[default]
    Sha256,
}

impl DigestAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Blake3 => "blake3",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(DigestAlgorithm::Blake3),
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            other => Err(LedgerError::Config(format!("unknown digest algorithm: {}", other))),
        }
    }
}

/// A 256-bit digest over a ledger's full content.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    pub const LEN: usize = 32;

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, the form recorded in signature lines.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let raw = hex::decode(s.trim())
            .map_err(|e| LedgerError::InvalidDigest(format!("{}: {}", s, e)))?;
        let bytes: [u8; 32] = raw.try_into().map_err(|raw: Vec<u8>| {
            LedgerError::InvalidDigest(format!(
                "expected {} bytes, found {}",
                Self::LEN,
                raw.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Compute the cumulative digest of `content`.
///
/// Always hashes from scratch; callers pass the whole buffer.
pub fn digest_of(algorithm: DigestAlgorithm, content: &[u8]) -> Digest {
    match algorithm {
        DigestAlgorithm::Blake3 => Digest(*blake3::hash(content).as_bytes()),
        DigestAlgorithm::Sha256 => Digest(Sha256::digest(content).into()),
    }
}

/// Streaming form of [`digest_of`].
///
/// `snapshot` yields the digest of everything fed so far without consuming
/// the hasher, which makes digesting every prefix of a ledger linear.
#[derive(Clone)]
pub enum CumulativeHasher {
    Blake3(Box<blake3::Hasher>),
    Sha256(Sha256),
}

impl CumulativeHasher {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Blake3 => CumulativeHasher::Blake3(Box::new(blake3::Hasher::new())),
            DigestAlgorithm::Sha256 => CumulativeHasher::Sha256(Sha256::new()),
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        match self {
            CumulativeHasher::Blake3(h) => {
                h.update(bytes);
            }
            CumulativeHasher::Sha256(h) => h.update(bytes),
        }
    }

    pub fn snapshot(&self) -> Digest {
        match self {
            CumulativeHasher::Blake3(h) => Digest(*h.finalize().as_bytes()),
            CumulativeHasher::Sha256(h) => Digest(h.clone().finalize().into()),
        }
    }
}
