//! Path resolution and directory-tree mutation (spec §4.3).
//!
//! Directory entries always store the full absolute child path with its
//! leading slash (the canonical form chosen for Q2 in `SPEC_FULL.md` —
//! no `entry.path[1:]` fallback).

use crate::context::RequestContext;
use crate::error::{FsError, FsResult};
use crate::kv::KvStore;
use crate::object::{self, DENTRY_SIZE, Fcb, KEY_SIZE, MAX_PATH, Metadata, ObjectId};

/// The prefix of `path` up to (not including) its last non-trailing `/`.
///
/// `/a/b` -> `/a`; `/a` -> `` (treated as `/`); `/a/b/` -> `/a` (trailing
/// slash ignored for the index computation).
pub fn parent_path(path: &str) -> String {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        Some(0) => String::new(),
        Some(idx) => trimmed[..idx].to_string(),
        None => String::new(),
    }
}

fn is_dir(fcb: &Fcb) -> bool {
    fcb.mode & libc::S_IFMT as u32 == libc::S_IFDIR as u32
}

fn encode_dentry(id: &ObjectId, path: &str) -> FsResult<Vec<u8>> {
    if path.len() >= MAX_PATH {
        return Err(FsError::NameTooLong);
    }
    let mut buf = vec![0u8; DENTRY_SIZE];
    buf[..KEY_SIZE].copy_from_slice(id);
    buf[KEY_SIZE..KEY_SIZE + path.len()].copy_from_slice(path.as_bytes());
    Ok(buf)
}

fn decode_dentry(bytes: &[u8]) -> FsResult<(ObjectId, String)> {
    if bytes.len() != DENTRY_SIZE {
        return Err(FsError::Io);
    }
    let mut id = [0u8; KEY_SIZE];
    id.copy_from_slice(&bytes[..KEY_SIZE]);
    let path_bytes = &bytes[KEY_SIZE..];
    let end = path_bytes.iter().position(|&b| b == 0).unwrap_or(path_bytes.len());
    let path = std::str::from_utf8(&path_bytes[..end]).map_err(|_| FsError::Io)?.to_string();
    Ok((id, path))
}

fn encode_dentries(entries: &[(ObjectId, String)]) -> FsResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(entries.len() * DENTRY_SIZE);
    for (id, path) in entries {
        buf.extend_from_slice(&encode_dentry(id, path)?);
    }
    Ok(buf)
}

fn decode_dentries(bytes: &[u8]) -> FsResult<Vec<(ObjectId, String)>> {
    if bytes.len() % DENTRY_SIZE != 0 {
        return Err(FsError::Io);
    }
    bytes.chunks(DENTRY_SIZE).map(decode_dentry).collect()
}

/// Fetch and decode a directory FCB's entry list.
pub fn read_dir_entries(kv: &dyn KvStore, dir: &Fcb) -> FsResult<Vec<(ObjectId, String)>> {
    if !is_dir(dir) {
        return Err(FsError::NotADirectory);
    }
    let md = object::get_meta(kv, &dir.data_id)?;
    let bytes = object::get_data(kv, dir, &md)?;
    decode_dentries(&bytes)
}

fn write_dir_entries(kv: &dyn KvStore, dir: &Fcb, entries: &[(ObjectId, String)]) -> FsResult<()> {
    object::set_data(kv, &dir.data_id, &encode_dentries(entries)?)
}

/// Resolve an absolute path to its FCB.
pub fn get_fcb(kv: &dyn KvStore, path: &str) -> FsResult<Fcb> {
    let root = object::load_root_fcb(kv)?;
    if path.is_empty() || path == "/" || path == root.path {
        return Ok(root);
    }

    let parent = get_fcb(kv, &parent_path(path))?;
    if !is_dir(&parent) {
        return Err(FsError::NotADirectory);
    }

    let entries = read_dir_entries(kv, &parent)?;
    let (child_id, _) = entries
        .into_iter()
        .find(|(_, entry_path)| entry_path == path)
        .ok_or(FsError::NotFound)?;
    object::load_fcb(kv, &child_id)
}

/// Locate `child_path` within `parent`'s entry list; returns the child FCB
/// and its index in the entry array (needed by mutating callers).
pub fn get_child_fcb(kv: &dyn KvStore, parent: &Fcb, child_path: &str) -> FsResult<(Fcb, usize)> {
    let entries = read_dir_entries(kv, parent)?;
    let (index, (child_id, _)) = entries
        .iter()
        .enumerate()
        .find(|(_, (_, entry_path))| entry_path == child_path)
        .map(|(i, e)| (i, e.clone()))
        .ok_or(FsError::NotFound)?;
    Ok((object::load_fcb(kv, &child_id)?, index))
}

/// Create a new FCB at `path`, wire it into its parent's entry list, and
/// return it alongside its freshly-initialised metadata.
pub fn attach_to_tree(
    kv: &dyn KvStore,
    path: &str,
    mode: u32,
    ctx: RequestContext,
) -> FsResult<(Fcb, Metadata)> {
    if path.len() >= MAX_PATH {
        return Err(FsError::NameTooLong);
    }

    let parent = get_fcb(kv, &parent_path(path))?;
    if !is_dir(&parent) {
        return Err(FsError::NotADirectory);
    }
    let mut parent_md = object::get_meta(kv, &parent.data_id)?;
    let mut entries = read_dir_entries(kv, &parent)?;

    let new_fcb = Fcb {
        path: path.to_string(),
        file_data_id: object::new_object_id(),
        data_id: object::new_object_id(),
        uid: ctx.uid,
        gid: ctx.gid,
        mode,
    };
    let new_md = Metadata::new_now();

    object::save_fcb(kv, &new_fcb)?;
    object::set_meta(kv, &new_fcb.data_id, new_md)?;

    entries.push((new_fcb.file_data_id, new_fcb.path.clone()));
    write_dir_entries(kv, &parent, &entries)?;

    parent_md.size += 1;
    parent_md.mtime = object::now();
    object::set_meta(kv, &parent.data_id, parent_md)?;

    Ok((new_fcb, new_md))
}

/// Remove `child` (found at `index` in `parent`'s entry list) from the tree.
///
/// Decrements the shared data object's `nlinks`; when it reaches zero the
/// data blob, its metadata record, and the child's own FCB entry are all
/// removed (Q1: the FCB key is not left dangling).
pub fn detach_from_tree(kv: &dyn KvStore, parent: &Fcb, child: &Fcb, index: usize) -> FsResult<()> {
    let mut child_md = object::get_meta(kv, &child.data_id)?;
    if child_md.nlinks <= 1 {
        object::remove_data(kv, &child.data_id)?;
        object::remove_meta(kv, &child.data_id)?;
        object::remove_fcb(kv, &child.file_data_id)?;
    } else {
        child_md.nlinks -= 1;
        object::set_meta(kv, &child.data_id, child_md)?;
    }

    let mut entries = read_dir_entries(kv, parent)?;
    if index >= entries.len() {
        return Err(FsError::Io);
    }
    entries.remove(index);
    write_dir_entries(kv, parent, &entries)?;

    let mut parent_md = object::get_meta(kv, &parent.data_id)?;
    parent_md.size = parent_md.size.saturating_sub(1);
    parent_md.mtime = object::now();
    object::set_meta(kv, &parent.data_id, parent_md)?;

    Ok(())
}
