//! Typed wrappers around the raw [`KvStore`] primitives (spec §4.1).
//!
//! This is the single chokepoint where [`KvError`] values get translated to
//! [`FsError`]; nothing above this module ever inspects a `KvError`.

use crate::error::{FsError, FsResult};
use crate::kv::KvStore;

/// Create-or-replace `key` with `value`.
pub fn store(kv: &dyn KvStore, key: &[u8], value: &[u8]) -> FsResult<()> {
    kv.kv_store(key, value).map_err(FsError::from)
}

/// Fetch the value stored under `key`.
pub fn fetch(kv: &dyn KvStore, key: &[u8]) -> FsResult<Vec<u8>> {
    kv.kv_fetch(key).map_err(FsError::from)
}

/// Remove the value stored under `key`.
pub fn remove(kv: &dyn KvStore, key: &[u8]) -> FsResult<()> {
    kv.kv_delete(key).map_err(FsError::from)
}
