//! The external ordered key-value store boundary (spec §1, §6).
//!
//! The real store is an out-of-scope collaborator: a production gateway
//! supplies its own [`KvStore`] wrapping an embedded engine. This module
//! only defines the trait and ships [`MemKvStore`], a `BTreeMap`-backed
//! ordered implementation used by the demo binary and the test suite.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Status codes the underlying store can report, prior to adapter translation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KvError {
    /// The requested key has no value.
    NotFound,
    /// The store could not allocate space for the operation.
    OutOfMemory,
    /// Any other store failure.
    Io,
}

/// The three primitives the core depends on, plus store lifecycle hooks.
///
/// Methods take `&self`: real embedded stores (the kind this trait stands in
/// for) serialize writes internally, so the core never needs to hold a
/// `&mut` reference to the store across an operation.
pub trait KvStore: Send + Sync {
    /// Create-or-replace a value under `key`.
    fn kv_store(&self, key: &[u8], value: &[u8]) -> Result<(), KvError>;

    /// Fetch the value stored under `key`, or `KvError::NotFound`.
    fn kv_fetch(&self, key: &[u8]) -> Result<Vec<u8>, KvError>;

    /// Remove the value stored under `key`, if any.
    fn kv_delete(&self, key: &[u8]) -> Result<(), KvError>;

    /// Invoked at unmount once the gateway is done with the store.
    fn close(&self) -> Result<(), KvError> {
        Ok(())
    }

    /// Invoked if a prior configuration pass reported an error at mount time.
    fn rollback(&self) -> Result<(), KvError> {
        Ok(())
    }
}

/// Ordered, in-memory stand-in for the embedded store.
#[derive(Debug, Default)]
pub struct MemKvStore {
    entries: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemKvStore {
    /// Open (and implicitly create) a fresh, empty store.
    pub fn open_with_create() -> Self {
        Self { entries: Mutex::new(BTreeMap::new()) }
    }
}

impl KvStore for MemKvStore {
    fn kv_store(&self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        let mut entries = self.entries.lock().map_err(|_| KvError::Io)?;
        entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn kv_fetch(&self, key: &[u8]) -> Result<Vec<u8>, KvError> {
        let entries = self.entries.lock().map_err(|_| KvError::Io)?;
        entries.get(key).cloned().ok_or(KvError::NotFound)
    }

    fn kv_delete(&self, key: &[u8]) -> Result<(), KvError> {
        let mut entries = self.entries.lock().map_err(|_| KvError::Io)?;
        entries.remove(key);
        Ok(())
    }
}
