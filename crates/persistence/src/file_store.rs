use crate::error::Result;
use crate::lock::LedgerLock;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tally_ledger::Storage;

/// A ledger stored as a single file.
///
/// Writes go to `<path>.tmp`, are fsync'd, then renamed over `<path>`, so a
/// reader sees either the old content or the new content.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    address: String,
    lock: Option<LedgerLock>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let address = path.display().to_string();
        Self {
            path,
            address,
            lock: None,
        }
    }

    /// Like [`FileStore::new`], but also takes the ledger's lock file so no
    /// other process can own the same ledger while this store lives.
    pub fn open_exclusive(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new(path);
        store.lock = Some(LedgerLock::acquire(&store.path)?);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_exclusive(&self) -> bool {
        self.lock.is_some()
    }
}

impl Storage for FileStore {
    fn address(&self) -> &str {
        &self.address
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, content: &[u8]) -> io::Result<()> {
        write_atomic(&self.path, content)
    }
}

/// `<path>` with `suffix` appended to the full file name.
pub(crate) fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Replace `path` with `content` via write-then-rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let tmp_path = sibling(path, ".tmp");
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}
