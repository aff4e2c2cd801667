pub mod accept;
pub mod audit;
pub mod digest;
pub mod inspect;
pub mod sign;
pub mod transfer;

use anyhow::{anyhow, Context};
use std::path::Path;
use tally_ledger::{Config, Ledger, LedgerError, Signature, Storage};
use tally_persistence::{BackupStore, FileStore};

pub type CliLedger = Ledger<BackupStore<FileStore>>;

/// Open a ledger for mutation: exclusive against other processes, mirrored
/// to the configured backups, hashed with the configured algorithm.
pub fn open_for_write(path: &Path, config: Option<&Config>) -> anyhow::Result<CliLedger> {
    let store = FileStore::open_exclusive(path)
        .with_context(|| format!("cannot open {} for writing", path.display()))?;
    let backups = config.map(|c| c.backups.clone()).unwrap_or_default();
    let algorithm = config.map(|c| c.digest).unwrap_or_default();
    Ok(Ledger::open(BackupStore::new(store, backups))?.with_algorithm(algorithm))
}

/// Commit, tolerating a failed backup once the primary file holds the new
/// content. The change is durable then, and repeating the command would
/// record it twice.
pub fn commit_durably(ledger: &mut CliLedger, signatures: &[Signature]) -> anyhow::Result<()> {
    match ledger.commit(signatures) {
        Ok(()) => Ok(()),
        Err(LedgerError::Storage(e)) if primary_holds(ledger) => {
            tracing::warn!(ledger = ledger.address(), error = %e, "Committed, but a backup copy is stale");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn primary_holds(ledger: &CliLedger) -> bool {
    matches!(ledger.store().primary().read(), Ok(Some(content)) if content == ledger.content())
}

/// Raw content of an existing ledger file.
pub fn read_ledger(path: &Path) -> anyhow::Result<Vec<u8>> {
    FileStore::new(path)
        .read()
        .with_context(|| format!("cannot read {}", path.display()))?
        .ok_or_else(|| anyhow!("ledger {} does not exist", path.display()))
}
