// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-process exclusive access.
//!
//! Two interleaved `make` calls would each hand out a digest that does not
//! match what ends up persisted, so every mutation of a ledger must hold its
//! lock. [`LedgerRegistry`] makes sure there is only one lock per address.

use crate::digest::DigestAlgorithm;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::storage::Storage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub type SharedLedger<S> = Arc<Mutex<Ledger<S>>>;

pub fn share<S: Storage>(ledger: Ledger<S>) -> SharedLedger<S> {
    Arc::new(Mutex::new(ledger))
}

/// One [`SharedLedger`] per storage address.
pub struct LedgerRegistry<S: Storage> {
    algorithm: DigestAlgorithm,
    ledgers: Mutex<HashMap<String, SharedLedger<S>>>,
}

impl<S: Storage> LedgerRegistry<S> {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            ledgers: Mutex::new(HashMap::new()),
        }
    }

    /// Open the ledger at `store`'s address, or return the handle already
    /// open for that address (in which case `store` is dropped).
    pub fn open(&self, store: S) -> Result<SharedLedger<S>> {
        let mut ledgers = self.ledgers.lock();
        if let Some(existing) = ledgers.get(store.address()) {
            tracing::debug!(address = store.address(), "Reusing open ledger");
            return Ok(Arc::clone(existing));
        }

        let address = store.address().to_string();
        let ledger = share(Ledger::open(store)?.with_algorithm(self.algorithm));
        ledgers.insert(address, Arc::clone(&ledger));
        Ok(ledger)
    }

    pub fn get(&self, address: &str) -> Option<SharedLedger<S>> {
        self.ledgers.lock().get(address).cloned()
    }

    /// Forget the handle for `address`. Holders of the returned handle keep
    /// a working ledger; the next `open` of that address reads the store anew.
    pub fn remove(&self, address: &str) -> Option<SharedLedger<S>> {
        let removed = self.ledgers.lock().remove(address);
        if removed.is_some() {
            tracing::debug!(address, "Ledger closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.ledgers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.lock().is_empty()
    }
}

impl<S: Storage> Default for LedgerRegistry<S> {
    fn default() -> Self {
        Self::new(DigestAlgorithm::default())
    }
}
