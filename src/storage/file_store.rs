//! File-backed key-value store

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::debug;

use super::KvStore;
use crate::error::StoreError;

/// One file per key under a data directory
///
/// Keys are fixed, dot-separated identifiers chosen by the session manager,
/// so they are used as file names directly. Writes go through a temp file
/// and rename so a crash mid-write never leaves a half-written value.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|_| StoreError::RootUnavailable(root.display().to_string()))?;
        debug!("File store opened at {}", root.display());
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{}.tmp", key));
        fs::write(&tmp, value).map_err(|e| StoreError::Io {
            key: key.to_string(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io {
            key: key.to_string(),
            source: e,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}
