//! Durable key-value storage module
//!
//! The session draft treats a synchronous, string-keyed store as its single
//! source of truth; everything in memory can be rebuilt from these keys.

pub mod file_store;
pub mod memory;

// Re-export main types
pub use file_store::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Synchronous, string-keyed durable storage
///
/// Mirrors the browser-profile local storage the draft was designed
/// around: small values, read on cold start, rewritten after every
/// mutation.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}
