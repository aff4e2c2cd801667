// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! tally-ledger: a two-party, append-only ledger attested by cumulative digests.
//!
//! Each party keeps its own log. After accepting a transaction a party hands
//! the other side the digest of its *whole* log; each side records the
//! other's digest as a signature line and persists.

pub mod audit;
pub mod buffer;
pub mod clock;
pub mod config;
pub mod digest;
pub mod entry;
pub mod error;
pub mod exchange;
pub mod instance;
pub mod ledger;
pub mod operation;
pub mod shared;
pub mod signature;
pub mod storage;

pub use config::Config;
pub use digest::{digest_of, Digest, DigestAlgorithm};
pub use entry::LedgerEntry;
pub use error::{LedgerError, Result};
pub use exchange::{Exchange, Phase};
pub use instance::{Instance, Transaction};
pub use ledger::Ledger;
pub use operation::Operation;
pub use shared::{LedgerRegistry, SharedLedger};
pub use signature::Signature;
pub use storage::{MemoryStore, Storage};

#[cfg(test)]
pub mod tests;
