//! The object store: FCBs, metadata records and data blobs, addressed the
//! way spec §3/§4.2/§6 lays out the keyspace.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::adapter;
use crate::error::{FsError, FsResult};
use crate::kv::KvStore;

/// Platform filename limit, matching `FILENAME_MAX` on the source platform.
pub const MAX_PATH: usize = libc::FILENAME_MAX as usize;
/// Width of a `file_data_id`/`data_id`.
pub const KEY_SIZE: usize = 16;
/// A file occupies exactly this many bytes once any write has occurred.
pub const MAX_FILE_SIZE: u64 = 4 * 1024 * 1024;
/// Width of one packed directory entry: child id followed by its full path.
pub const DENTRY_SIZE: usize = KEY_SIZE + MAX_PATH;
/// Well-known key the root FCB is stored under (NUL terminator included).
pub const ROOT_OBJECT_KEY: &[u8] = b"root_object_key\0";
/// Literal prefix for metadata keys: `"meta "` (note the trailing space).
pub const META_PREFIX: &[u8] = b"meta ";
/// Fixed `data_id` of the root directory's entry list.
pub const ROOT_DATA_ID: [u8; KEY_SIZE] = *b"root_direntries\0";

/// A 16-byte opaque identifier (`file_data_id` or `data_id`).
pub type ObjectId = [u8; KEY_SIZE];

/// Seconds since the epoch, the timestamp resolution metadata uses.
pub fn now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64
}

/// One inode-like record (spec §3 "FCB").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fcb {
    pub path: String,
    pub file_data_id: ObjectId,
    pub data_id: ObjectId,
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
}

/// The size/nlinks/timestamps tuple keyed by `"meta " || data_id` (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub size: u64,
    pub nlinks: u32,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
}

impl Metadata {
    /// A freshly-attached object: one link, zero size, all three times now.
    pub fn new_now() -> Self {
        let t = now();
        Self { size: 0, nlinks: 1, atime: t, mtime: t, ctime: t }
    }
}

fn meta_key(data_id: &ObjectId) -> Vec<u8> {
    let mut key = Vec::with_capacity(META_PREFIX.len() + KEY_SIZE);
    key.extend_from_slice(META_PREFIX);
    key.extend_from_slice(data_id);
    key
}

fn encode<T: Serialize>(value: &T) -> FsResult<Vec<u8>> {
    bincode::serialize(value).map_err(|_| FsError::Io)
}

fn decode<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> FsResult<T> {
    bincode::deserialize(bytes).map_err(|_| FsError::Io)
}

/// Fetch the FCB stored under the well-known root key.
pub fn load_root_fcb(kv: &dyn KvStore) -> FsResult<Fcb> {
    decode(&adapter::fetch(kv, ROOT_OBJECT_KEY)?)
}

/// Persist `fcb` under the well-known root key.
pub fn save_root_fcb(kv: &dyn KvStore, fcb: &Fcb) -> FsResult<()> {
    adapter::store(kv, ROOT_OBJECT_KEY, &encode(fcb)?)
}

/// Fetch the FCB stored under `file_data_id`.
pub fn load_fcb(kv: &dyn KvStore, file_data_id: &ObjectId) -> FsResult<Fcb> {
    decode(&adapter::fetch(kv, file_data_id)?)
}

/// Persist `fcb` under its own `file_data_id`.
pub fn save_fcb(kv: &dyn KvStore, fcb: &Fcb) -> FsResult<()> {
    adapter::store(kv, &fcb.file_data_id, &encode(fcb)?)
}

/// Remove the FCB stored under `file_data_id`.
pub fn remove_fcb(kv: &dyn KvStore, file_data_id: &ObjectId) -> FsResult<()> {
    adapter::remove(kv, file_data_id)
}

/// Fetch the metadata record for `data_id`.
pub fn get_meta(kv: &dyn KvStore, data_id: &ObjectId) -> FsResult<Metadata> {
    decode(&adapter::fetch(kv, &meta_key(data_id))?)
}

/// Persist `md` for `data_id`, refreshing `ctime` first (invariant I7).
pub fn set_meta(kv: &dyn KvStore, data_id: &ObjectId, mut md: Metadata) -> FsResult<()> {
    md.ctime = now();
    adapter::store(kv, &meta_key(data_id), &encode(&md)?)
}

/// Delete the metadata record for `data_id`.
pub fn remove_meta(kv: &dyn KvStore, data_id: &ObjectId) -> FsResult<()> {
    adapter::remove(kv, &meta_key(data_id))
}

/// Read the current link count for `data_id`.
pub fn get_nlinks(kv: &dyn KvStore, data_id: &ObjectId) -> FsResult<u32> {
    Ok(get_meta(kv, data_id)?.nlinks)
}

/// Read-modify-write the link count for `data_id`.
pub fn set_nlinks(kv: &dyn KvStore, data_id: &ObjectId, nlinks: u32) -> FsResult<()> {
    let mut md = get_meta(kv, data_id)?;
    md.nlinks = nlinks;
    set_meta(kv, data_id, md)
}

/// Fetch the data blob for `fcb`, sized per `md` and the FCB's file type.
pub fn get_data(kv: &dyn KvStore, fcb: &Fcb, md: &Metadata) -> FsResult<Vec<u8>> {
    let expected_len = if fcb.mode & libc::S_IFMT as u32 == libc::S_IFDIR as u32 {
        md.size as usize * DENTRY_SIZE
    } else if fcb.mode & libc::S_IFMT as u32 == libc::S_IFLNK as u32 {
        md.size as usize
    } else {
        MAX_FILE_SIZE as usize
    };

    if expected_len == 0 {
        return Ok(Vec::new());
    }

    let blob = adapter::fetch(kv, &fcb.data_id)?;
    if blob.len() != expected_len {
        return Err(FsError::Io);
    }
    Ok(blob)
}

/// Persist the raw data blob for `data_id`.
pub fn set_data(kv: &dyn KvStore, data_id: &ObjectId, bytes: &[u8]) -> FsResult<()> {
    adapter::store(kv, data_id, bytes)
}

/// Delete the data blob for `data_id`.
pub fn remove_data(kv: &dyn KvStore, data_id: &ObjectId) -> FsResult<()> {
    adapter::remove(kv, data_id)
}

/// Generate a fresh random object id.
pub fn new_object_id() -> ObjectId {
    rand::random()
}
