// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Persistence boundary.
//!
//! A ledger lives in exactly one addressable blob. The engine only needs
//! three things from it: an address to report, a whole-blob read that
//! distinguishes "absent" from "unreadable", and a whole-blob replace that a
//! reader never observes half-done.
//!
//! File-backed stores live in `tally-persistence`; [`MemoryStore`] here backs
//! tests and embedders that keep ledgers in memory.

use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait Storage: Send {
    /// Human-readable location, used for logging and registry keys.
    fn address(&self) -> &str;

    /// Full content, or `None` when nothing has been stored yet.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replace the full content.
    fn write(&mut self, content: &[u8]) -> io::Result<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn address(&self) -> &str {
        (**self).address()
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        (**self).read()
    }

    fn write(&mut self, content: &[u8]) -> io::Result<()> {
        (**self).write(content)
    }
}

/// In-memory blob.
///
/// Clones share the same blob, so a test can keep a handle to inspect what
/// a ledger persisted.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    address: String,
    blob: Arc<Mutex<Option<Vec<u8>>>>,
    fail_io: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Empty store: reads report "not found".
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            blob: Arc::new(Mutex::new(None)),
            fail_io: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_content(address: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let store = Self::new(address);
        *store.blob.lock() = Some(content.into());
        store
    }

    /// Currently persisted bytes.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.blob.lock().clone()
    }

    /// Overwrite the blob behind the ledger's back.
    pub fn set_contents(&self, content: impl Into<Vec<u8>>) {
        *self.blob.lock() = Some(content.into());
    }

    /// Make every subsequent read and write fail with an I/O error.
    pub fn fail_io(&self, fail: bool) {
        self.fail_io.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> io::Result<()> {
        if self.fail_io.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("injected I/O failure on {}", self.address),
            ));
        }
        Ok(())
    }
}

impl Storage for MemoryStore {
    fn address(&self) -> &str {
        &self.address
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.blob.lock().clone())
    }

    fn write(&mut self, content: &[u8]) -> io::Result<()> {
        self.check()?;
        *self.blob.lock() = Some(content.to_vec());
        Ok(())
    }
}
