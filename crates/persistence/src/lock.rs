use crate::error::{PersistenceError, Result};
use crate::file_store::sibling;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Exclusive ownership of a ledger file across processes.
///
/// Held as `<ledger>.lock`, created with create-new semantics and removed on
/// drop. A process that dies while holding it leaves the file behind; it has
/// to be removed by hand before the ledger can be opened exclusively again.
#[derive(Debug)]
pub struct LedgerLock {
    ledger: PathBuf,
    path: PathBuf,
}

impl LedgerLock {
    pub fn acquire(ledger: &Path) -> Result<Self> {
        let path = sibling(ledger, ".lock");
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(PersistenceError::Locked(ledger.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        writeln!(file, "{}", std::process::id())?;
        file.sync_all()?;

        tracing::debug!(ledger = %ledger.display(), "Ledger lock acquired");
        Ok(Self {
            ledger: ledger.to_path_buf(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(ledger = %self.ledger.display(), error = %e, "Failed to release ledger lock");
        }
    }
}
