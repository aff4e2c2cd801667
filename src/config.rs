// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Party configuration.
//!
//! Who the local party is, who it trades with, and where backups of its
//! ledger go. Loaded once at startup and passed by reference; the engine
//! never re-reads it.
//!
//! ```json
//! {
//!   "Self": "a@x",
//!   "Contacts": ["b@x"],
//!   "Backups": ["/mnt/backup/ledger.log"],
//!   "Digest": "blake3"
//! }
//! ```

use crate::digest::{Digest, DigestAlgorithm};
use crate::error::{LedgerError, Result};
use crate::signature::Signature;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name looked up in the working directory.
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Local party identifier, used as the author of our signatures.
    #[serde(rename = "Self")]
    pub self_id: String,

    /// Known counterparts.
    #[serde(rename = "Contacts", default)]
    pub contacts: Vec<String>,

    /// Backup addresses mirrored on every persist.
    #[serde(rename = "Backups", default)]
    pub backups: Vec<PathBuf>,

    #[serde(rename = "Digest", default)]
    pub digest: DigestAlgorithm,
}

impl Config {
    pub fn new(self_id: impl Into<String>) -> Self {
        Self {
            self_id: self_id.into(),
            contacts: Vec::new(),
            backups: Vec::new(),
            digest: DigestAlgorithm::default(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)
            .map_err(|e| LedgerError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_slice(&data)
            .map_err(|e| LedgerError::Config(format!("{}: {}", path.display(), e)))?;
        if config.self_id.trim().is_empty() {
            return Err(LedgerError::Config(format!(
                "{}: \"Self\" must not be empty",
                path.display()
            )));
        }
        tracing::debug!(path = %path.display(), self_id = %config.self_id, "Config loaded");
        Ok(config)
    }

    /// Write as pretty JSON via a temporary file and rename.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_vec_pretty(self)?;
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn is_contact(&self, id: &str) -> bool {
        self.contacts.iter().any(|c| c == id)
    }

    /// Add a counterpart if it is not already known. Returns whether it was added.
    pub fn add_contact(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.is_contact(&id) {
            return false;
        }
        self.contacts.push(id);
        true
    }

    /// A signature authored by the local party.
    pub fn signature(&self, digest: Digest) -> Signature {
        Signature::new(self.self_id.clone(), digest)
    }
}
