// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Signature lines.
//!
//! A signature is a recorded digest, not a cryptographic signature: it says
//! "`author` reported this digest over its own ledger". It is stored as a
//! plain text line `author:hexdigest` so the ledger stays a flat text object.

use crate::digest::Digest;
use crate::error::{LedgerError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub author: String,
    pub digest: Digest,
}

impl Signature {
    pub fn new(author: impl Into<String>, digest: Digest) -> Self {
        Self {
            author: author.into(),
            digest,
        }
    }

    /// Check that the signature renders as exactly one parseable line.
    pub fn validate(&self) -> Result<()> {
        if self.author.is_empty() {
            return Err(LedgerError::InvalidSignature("empty author".to_string()));
        }
        if self.author.contains(&['\n', '\r'][..]) {
            return Err(LedgerError::InvalidSignature(format!(
                "line break in author {:?}",
                self.author
            )));
        }
        Ok(())
    }

    /// Render as `author:hexdigest`.
    pub fn to_line(&self) -> String {
        format!("{}:{}", self.author, self.digest.to_hex())
    }

    /// Parse a signature line.
    ///
    /// Splits on the last `:` since the hex digest never contains one while
    /// an author identifier (a URL, say) may.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(&['\n', '\r'][..]);
        let (author, hex) = line
            .rsplit_once(':')
            .ok_or_else(|| LedgerError::InvalidSignature(line.to_string()))?;
        let digest = Digest::from_hex(hex)
            .map_err(|e| LedgerError::InvalidSignature(format!("{}: {}", line, e)))?;
        let signature = Self::new(author, digest);
        signature.validate()?;
        Ok(signature)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
