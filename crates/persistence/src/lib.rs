pub mod backup;
pub mod error;
pub mod file_store;
pub mod fixtures;
pub mod lock;

pub use backup::BackupStore;
pub use error::{PersistenceError, Result};
pub use file_store::FileStore;
pub use lock::LedgerLock;
