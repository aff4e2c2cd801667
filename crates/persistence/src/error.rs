use std::io;
use std::path::PathBuf;
use tally_ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Ledger {0} is locked by another owner")]
    Locked(PathBuf),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
