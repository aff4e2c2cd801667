// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger Log
//!
//! One party's append-only record of transactions and attestations.
//!
//! # Protocol
//! ```text
//! A: make(op)          → line appended, D1 = digest(A)
//!    ─ D1 + line ─────────────────────────────▶ B
//!                        B: accept(line) → line appended, D2 = digest(B)
//!    ◀──────────────────────────────────── D2 ─
//! A: commit([B:D2])    → signature line, persist
//!                        B: commit([A:D1]) → signature line, persist
//! ```
//!
//! # Invariants
//! - The buffer only grows; `reload` is the only way to drop bytes, and it
//!   drops exactly the bytes that were never persisted.
//! - Every returned digest covers the full buffer as it stood right after
//!   the append that produced it.
//! - Received digests are recorded on trust. Checking them against the
//!   counterpart's history is the job of [`crate::audit`].
//!
//! A `Ledger` has no internal locking. Share it through
//! [`crate::shared::SharedLedger`] when more than one caller can reach it.

use crate::buffer::ContentBuffer;
use crate::clock::{Clock, SystemClock};
use crate::digest::{digest_of, Digest, DigestAlgorithm};
use crate::entry::{parse_entries, LedgerEntry};
use crate::error::{LedgerError, Result};
use crate::instance::Transaction;
use crate::operation::Operation;
use crate::signature::Signature;
use crate::storage::Storage;
use std::sync::Arc;

pub struct Ledger<S: Storage> {
    store: S,
    buffer: ContentBuffer,
    algorithm: DigestAlgorithm,
    clock: Arc<dyn Clock>,
    /// Length of the buffer prefix known to match the store.
    persisted_len: usize,
    /// Local digest of the exchange currently in flight, if any.
    pub(crate) open_exchange: Option<Digest>,
}

impl<S: Storage> Ledger<S> {
    /// Open the ledger held by `store`.
    ///
    /// A store with nothing in it is a valid, empty ledger. Any other read
    /// failure is returned.
    pub fn open(store: S) -> Result<Self> {
        let content = store.read()?;
        let exists = content.is_some();
        let content = content.unwrap_or_default();
        let persisted_len = if exists { content.len() } else { 0 };

        tracing::info!(
            address = store.address(),
            bytes = content.len(),
            exists,
            "Ledger opened"
        );

        Ok(Self {
            store,
            buffer: ContentBuffer::from_bytes(content),
            algorithm: DigestAlgorithm::default(),
            clock: Arc::new(SystemClock),
            persisted_len,
            open_exchange: None,
        })
    }

    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Append a raw line (newline added).
    pub fn push(&mut self, line: &[u8]) {
        self.buffer.push(line);
        tracing::trace!(bytes = line.len(), total = self.buffer.len(), "Line pushed");
    }

    /// Cumulative digest of the current in-memory content.
    pub fn digest(&self) -> Digest {
        digest_of(self.algorithm, self.buffer.as_bytes())
    }

    /// Write the full buffer to the store.
    pub fn save(&mut self) -> Result<()> {
        self.store.write(self.buffer.as_bytes()).map_err(|e| {
            tracing::error!(address = self.store.address(), error = %e, "Ledger save failed");
            LedgerError::Storage(e)
        })?;
        self.persisted_len = self.buffer.len();
        tracing::info!(
            address = self.store.address(),
            bytes = self.persisted_len,
            "Ledger persisted"
        );
        Ok(())
    }

    /// Discard in-memory content and re-read the store.
    ///
    /// Unlike [`Ledger::open`], an absent blob is an error here: a ledger
    /// that was open must still exist. Dropping unsaved lines also drops the
    /// exchange in flight, whose transaction may be among them.
    pub fn reload(&mut self) -> Result<()> {
        let content = self
            .store
            .read()?
            .ok_or_else(|| LedgerError::MissingLedger(self.store.address().to_string()))?;

        let had_pending = self.has_pending_changes();
        let discarded = self.buffer.len().saturating_sub(self.persisted_len);
        self.persisted_len = content.len();
        self.buffer.replace(content);

        if had_pending {
            if let Some(digest) = self.open_exchange.take() {
                tracing::warn!(
                    address = self.store.address(),
                    digest = %digest,
                    "Reload discarded the exchange in flight"
                );
            }
        }

        tracing::info!(
            address = self.store.address(),
            bytes = self.persisted_len,
            discarded,
            "Ledger reloaded"
        );
        Ok(())
    }

    /// Wrap `op` into a timestamped instance, append it and return the
    /// resulting digest.
    ///
    /// This is the only place a timestamp is stamped. Nothing is appended if
    /// the payload fails to serialize.
    pub fn make<O: Operation>(
        &mut self,
        op: &O,
        counterparties: Vec<String>,
    ) -> Result<(Transaction, Digest)> {
        let transaction = Transaction::from_operation(op, counterparties, self.clock.now())?;

        self.buffer.push(transaction.as_bytes());
        let digest = self.digest();

        tracing::debug!(
            op = %transaction.instance().op,
            bytes = transaction.as_bytes().len(),
            digest = %digest,
            "Transaction made"
        );
        Ok((transaction, digest))
    }

    /// Append a transaction produced by another party, byte for byte.
    ///
    /// Does not persist.
    pub fn accept(&mut self, transaction: &Transaction) -> Digest {
        self.buffer.push(transaction.as_bytes());
        let digest = self.digest();

        tracing::debug!(
            op = %transaction.instance().op,
            bytes = transaction.as_bytes().len(),
            digest = %digest,
            "Transaction accepted"
        );
        digest
    }

    /// Parse `line` as a transaction and accept it.
    pub fn accept_line(&mut self, line: impl Into<Vec<u8>>) -> Result<(Transaction, Digest)> {
        let transaction = Transaction::from_line(line)?;
        let digest = self.accept(&transaction);
        Ok((transaction, digest))
    }

    /// Append one `author:hexdigest` line per signature, in order, without
    /// persisting.
    ///
    /// The whole batch is checked first; if any signature is invalid nothing
    /// is appended.
    pub fn sign(&mut self, signatures: &[Signature]) -> Result<()> {
        for signature in signatures {
            signature.validate()?;
        }
        for signature in signatures {
            self.buffer.push(signature.to_line().as_bytes());
            tracing::debug!(author = %signature.author, digest = %signature.digest, "Signature recorded");
        }
        Ok(())
    }

    /// Append the signatures and persist.
    ///
    /// With no signatures this just persists whatever is pending. If the
    /// save fails the signature lines stay in memory; a later `commit(&[])`
    /// persists them, `reload` drops them.
    pub fn commit(&mut self, signatures: &[Signature]) -> Result<()> {
        self.sign(signatures)?;
        self.save()
    }

    pub fn content(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the buffer holds bytes the store has not seen.
    pub fn has_pending_changes(&self) -> bool {
        self.buffer.len() != self.persisted_len
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn address(&self) -> &str {
        self.store.address()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Digest of the exchange in flight on this ledger, if any.
    pub fn open_exchange(&self) -> Option<Digest> {
        self.open_exchange
    }

    /// Parse the current content into entries.
    pub fn entries(&self) -> Vec<(usize, LedgerEntry)> {
        parse_entries(self.buffer.as_bytes())
    }
}
