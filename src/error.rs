// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// The backing store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// An operation payload or instance could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `reload` found nothing at the ledger address.
    #[error("Ledger not found at {0}")]
    MissingLedger(String),

    #[error("Invalid transaction instance: {0}")]
    InvalidInstance(String),

    #[error("Invalid signature line: {0}")]
    InvalidSignature(String),

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// An exchange was driven out of order.
    #[error("Invalid exchange transition: {0}")]
    InvalidTransition(String),
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
pub type Result<T> = LedgerResult<T>;
