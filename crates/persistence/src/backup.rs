use crate::file_store::write_atomic;
use std::io;
use std::path::{Path, PathBuf};
use tally_ledger::Storage;

/// Mirrors every write of a primary store to a set of backup files.
///
/// Reads only ever come from the primary. The primary is written first; if
/// it fails nothing is mirrored. A failing backup does not stop the other
/// backups, and the first such failure is returned once all were attempted,
/// so the caller learns about it even though the primary is up to date.
pub struct BackupStore<S: Storage> {
    primary: S,
    backups: Vec<PathBuf>,
}

impl<S: Storage> BackupStore<S> {
    pub fn new(primary: S, backups: Vec<PathBuf>) -> Self {
        Self { primary, backups }
    }

    pub fn primary(&self) -> &S {
        &self.primary
    }

    pub fn backups(&self) -> &[PathBuf] {
        &self.backups
    }

    fn mirror(&self, content: &[u8]) -> io::Result<()> {
        let mut first_error: Option<(PathBuf, io::Error)> = None;
        for backup in &self.backups {
            if let Err(e) = write_atomic(backup, content) {
                tracing::warn!(
                    ledger = self.primary.address(),
                    backup = %backup.display(),
                    error = %e,
                    "Backup write failed"
                );
                if first_error.is_none() {
                    first_error = Some((backup.clone(), e));
                }
            }
        }

        match first_error {
            None => Ok(()),
            Some((path, e)) => Err(backup_error(&path, e)),
        }
    }
}

fn backup_error(path: &Path, e: io::Error) -> io::Error {
    io::Error::new(e.kind(), format!("backup {}: {}", path.display(), e))
}

impl<S: Storage> Storage for BackupStore<S> {
    fn address(&self) -> &str {
        self.primary.address()
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        self.primary.read()
    }

    fn write(&mut self, content: &[u8]) -> io::Result<()> {
        self.primary.write(content)?;
        self.mirror(content)
    }
}
