// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Exchange - one transaction in flight
//!
//! Wraps the raw `make` / `accept` / `commit` calls in the per-transaction
//! state machine and enforces at most one exchange in flight per ledger.
//!
//! # Initiator
//! ```text
//! create ──▶ Created ──propose──▶ Proposed ──record_acceptance──▶ Accepted ──commit──▶ Committed
//! ```
//! # Counterparty
//! ```text
//! receive ──▶ Accepted ──record_acceptance──▶ Accepted ──commit──▶ Committed
//! ```
//! `abandon` ends an exchange from any non-terminal phase. The transaction
//! line stays in the ledger; only the in-flight slot is released.

use crate::digest::Digest;
use crate::error::{LedgerError, Result};
use crate::instance::Transaction;
use crate::ledger::Ledger;
use crate::operation::Operation;
use crate::signature::Signature;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Appended locally, digest not shared yet.
    Created,
    /// Transaction line and digest handed to the counterparty.
    Proposed,
    /// At least one counterparty digest is known (or, for the counterparty
    /// side, the proposal has been accepted locally).
    Accepted,
    /// Signature lines appended and persisted.
    Committed,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Counterparty,
}

#[derive(Debug, Clone)]
pub struct Exchange {
    role: Role,
    phase: Phase,
    transaction: Transaction,
    local_digest: Digest,
    attestations: Vec<Signature>,
    /// Signature lines already appended by a commit whose save failed.
    signed: bool,
}

impl Exchange {
    /// Start an exchange as the initiator: `make` the transaction.
    pub fn create<S: Storage, O: Operation>(
        ledger: &mut Ledger<S>,
        op: &O,
        counterparties: Vec<String>,
    ) -> Result<Self> {
        ensure_idle(ledger)?;
        let (transaction, local_digest) = ledger.make(op, counterparties)?;
        ledger.open_exchange = Some(local_digest);
        Ok(Self::start(Role::Initiator, Phase::Created, transaction, local_digest))
    }

    /// Join an exchange as the counterparty: `accept` the proposer's line.
    pub fn receive<S: Storage>(ledger: &mut Ledger<S>, transaction: Transaction) -> Result<Self> {
        ensure_idle(ledger)?;
        let local_digest = ledger.accept(&transaction);
        ledger.open_exchange = Some(local_digest);
        Ok(Self::start(Role::Counterparty, Phase::Accepted, transaction, local_digest))
    }

    fn start(role: Role, phase: Phase, transaction: Transaction, local_digest: Digest) -> Self {
        Self {
            role,
            phase,
            transaction,
            local_digest,
            attestations: Vec::new(),
            signed: false,
        }
    }

    /// Hand out the transaction and our digest for the counterparty.
    pub fn propose(&mut self) -> Result<(&Transaction, Digest)> {
        self.expect(Role::Initiator, &[Phase::Created, Phase::Proposed], "propose")?;
        self.phase = Phase::Proposed;
        Ok((&self.transaction, self.local_digest))
    }

    /// Record the digest a counterparty returned for this transaction.
    ///
    /// The initiator may record several counterparties before committing.
    pub fn record_acceptance(&mut self, counterparty: impl Into<String>, digest: Digest) -> Result<()> {
        match self.role {
            Role::Initiator => {
                self.expect(Role::Initiator, &[Phase::Proposed, Phase::Accepted], "record_acceptance")?
            }
            Role::Counterparty => {
                self.expect(Role::Counterparty, &[Phase::Accepted], "record_acceptance")?
            }
        }
        if self.signed {
            return Err(LedgerError::InvalidTransition(
                "signatures already appended".to_string(),
            ));
        }
        let signature = Signature::new(counterparty, digest);
        signature.validate()?;
        self.attestations.push(signature);
        self.phase = Phase::Accepted;
        Ok(())
    }

    /// Append the recorded signatures and persist.
    ///
    /// A failed save leaves the exchange in `Accepted`; calling `commit`
    /// again only retries the save.
    pub fn commit<S: Storage>(&mut self, ledger: &mut Ledger<S>) -> Result<()> {
        self.expect(self.role, &[Phase::Accepted], "commit")?;
        if self.attestations.is_empty() {
            return Err(LedgerError::InvalidTransition(
                "commit without any counterparty digest".to_string(),
            ));
        }
        self.ensure_owner(ledger)?;

        if !self.signed {
            ledger.sign(&self.attestations)?;
            self.signed = true;
        }
        ledger.save()?;

        ledger.open_exchange = None;
        self.phase = Phase::Committed;
        tracing::debug!(
            op = %self.transaction.instance().op,
            signatures = self.attestations.len(),
            "Exchange committed"
        );
        Ok(())
    }

    /// Give up on the exchange and free the ledger for the next one.
    pub fn abandon<S: Storage>(&mut self, ledger: &mut Ledger<S>) -> Result<()> {
        if matches!(self.phase, Phase::Committed | Phase::Abandoned) {
            return Err(LedgerError::InvalidTransition(format!(
                "cannot abandon a {:?} exchange",
                self.phase
            )));
        }
        // A reload may already have released the ledger.
        if ledger.open_exchange.is_some() {
            self.ensure_owner(ledger)?;
            ledger.open_exchange = None;
        }
        self.phase = Phase::Abandoned;
        tracing::warn!(op = %self.transaction.instance().op, "Exchange abandoned");
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Digest of our own ledger right after the transaction was appended.
    pub fn local_digest(&self) -> Digest {
        self.local_digest
    }

    pub fn attestations(&self) -> &[Signature] {
        &self.attestations
    }

    fn expect(&self, role: Role, phases: &[Phase], action: &str) -> Result<()> {
        if self.role != role || !phases.contains(&self.phase) {
            return Err(LedgerError::InvalidTransition(format!(
                "{} not allowed for {:?} in {:?}",
                action, self.role, self.phase
            )));
        }
        Ok(())
    }

    fn ensure_owner<S: Storage>(&self, ledger: &Ledger<S>) -> Result<()> {
        if ledger.open_exchange != Some(self.local_digest) {
            return Err(LedgerError::InvalidTransition(format!(
                "exchange is not in flight on {}",
                ledger.address()
            )));
        }
        Ok(())
    }
}

fn ensure_idle<S: Storage>(ledger: &Ledger<S>) -> Result<()> {
    match ledger.open_exchange {
        Some(open) => Err(LedgerError::InvalidTransition(format!(
            "exchange {} already in flight on {}",
            open,
            ledger.address()
        ))),
        None => Ok(()),
    }
}
