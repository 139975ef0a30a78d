//! # TWQ Snapshot Storage
//!
//! Persistence for the player account snapshot. The full snapshot is always
//! written and flushed as one unit, so a crash mid-write leaves either the
//! previous snapshot or the new one on disk, never a mix.
//!
//! ## Storage Layout
//!
//! - `account.json` - one pretty-printed JSON snapshot per installation
//! - `account.json.tmp` - transient staging file, renamed over the target

use thiserror::Error;

/// Snapshot persistence failure
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot did not parse or serialize
    #[error("snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
}

pub mod file_store {
    //! Atomic file-backed snapshot store

    use super::StoreError;
    use std::fs::{self, File};
    use std::io::{ErrorKind, Write};
    use std::path::{Path, PathBuf};
    use tracing::debug;
    use twq_ledger::{LedgerError, PlayerAccount, SnapshotStore};

    /// Snapshot store backed by one JSON file
    ///
    /// Writes go to a staging file in the same directory, are flushed with
    /// `sync_all`, and then renamed over the target.
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn try_load(&self) -> Result<Option<PlayerAccount>, StoreError> {
            let bytes = match fs::read(&self.path) {
                Ok(bytes) => bytes,
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(err.into()),
            };
            let account = serde_json::from_slice(&bytes)?;
            Ok(Some(account))
        }

        fn try_save(&self, account: &PlayerAccount) -> Result<(), StoreError> {
            if let Some(dir) = self.path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir)?;
                }
            }

            let staging = self.path.with_extension("json.tmp");
            {
                let mut file = File::create(&staging)?;
                file.write_all(&serde_json::to_vec_pretty(account)?)?;
                file.sync_all()?;
            }
            fs::rename(&staging, &self.path)?;

            debug!(path = %self.path.display(), "snapshot written");
            Ok(())
        }
    }

    impl SnapshotStore for FileStore {
        fn load(&self) -> twq_ledger::Result<Option<PlayerAccount>> {
            self.try_load()
                .map_err(|err| LedgerError::Persistence(err.to_string()))
        }

        fn save(&self, account: &PlayerAccount) -> twq_ledger::Result<()> {
            self.try_save(account)
                .map_err(|err| LedgerError::Persistence(err.to_string()))
        }
    }
}

pub mod memory_store {
    //! In-memory snapshot store for tests and embedding

    use parking_lot::RwLock;
    use std::sync::atomic::{AtomicBool, Ordering};
    use twq_ledger::{LedgerError, PlayerAccount, SnapshotStore};

    /// Volatile snapshot store
    ///
    /// `set_fail_saves` makes every subsequent write fail, which lets tests
    /// verify that rejected persistence leaves the ledger untouched.
    #[derive(Default)]
    pub struct MemoryStore {
        slot: RwLock<Option<PlayerAccount>>,
        fail_saves: AtomicBool,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Toggle write failure injection
        pub fn set_fail_saves(&self, fail: bool) {
            self.fail_saves.store(fail, Ordering::SeqCst);
        }
    }

    impl SnapshotStore for MemoryStore {
        fn load(&self) -> twq_ledger::Result<Option<PlayerAccount>> {
            Ok(self.slot.read().clone())
        }

        fn save(&self, account: &PlayerAccount) -> twq_ledger::Result<()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(LedgerError::Persistence("memory store refused write".into()));
            }
            *self.slot.write() = Some(account.clone());
            Ok(())
        }
    }
}

// Re-export for convenience
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

#[cfg(test)]
mod tests {
    use super::*;
    use twq_ledger::{PlayerAccount, SnapshotStore, TonAmount};

    #[test]
    fn test_file_store_missing_file_is_fresh_install() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("account.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("account.json"));

        let mut account = PlayerAccount::new();
        account.total_points = 9001;
        account.ton_balance = TonAmount::from_minor(10_166);
        store.save(&account).unwrap();

        let restored = store.load().unwrap().unwrap();
        assert_eq!(restored, account);
    }

    #[test]
    fn test_file_store_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("account.json"));

        let mut account = PlayerAccount::new();
        store.save(&account).unwrap();
        account.total_points = 5;
        store.save(&account).unwrap();

        assert_eq!(store.load().unwrap().unwrap().total_points, 5);
        // no staging file left behind
        assert!(!dir.path().join("account.json.tmp").exists());
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/data/account.json"));
        store.save(&PlayerAccount::new()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_file_store_surfaces_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("account.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = FileStore::new(path);
        assert!(store.load().is_err());
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let store = MemoryStore::new();
        let account = PlayerAccount::new();
        store.save(&account).unwrap();

        store.set_fail_saves(true);
        assert!(store.save(&account).is_err());

        // reads still serve the last good snapshot
        assert_eq!(store.load().unwrap().unwrap(), account);
    }
}
