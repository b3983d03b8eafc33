//! `KvFilesystem`: the `Filesystem` trait wired to the object store,
//! namespace engine and permission resolver over a [`KvStore`] (spec §4.4).

use tracing::{debug, trace, warn};

use crate::context::RequestContext;
use crate::error::{FsError, FsResult};
use crate::kv::KvStore;
use crate::namespace;
use crate::object::{self, Fcb, MAX_FILE_SIZE};
use crate::permissions::{self, Handle, OpenFlags};
use crate::vfs::{DirEntry, FileAttr, Filesystem, UtimeSpec};

/// A mounted filesystem instance: just the KV handle. Every path, including
/// `/`, is resolved fresh through `namespace::get_fcb` on each call, so there
/// is no root FCB cache to guard (spec §5).
pub struct KvFilesystem<S: KvStore> {
    kv: S,
}

impl<S: KvStore> KvFilesystem<S> {
    /// Mount over `kv`, creating the root sentinel if it is absent (I6).
    pub fn mount(kv: S, uid: u32, gid: u32) -> FsResult<Self> {
        match object::load_root_fcb(&kv) {
            Ok(_) => {}
            Err(FsError::NotFound) => {
                debug!("root sentinel absent, creating");
                let root = Fcb {
                    path: "/".to_string(),
                    file_data_id: *b"root_object_key\0",
                    data_id: object::ROOT_DATA_ID,
                    uid,
                    gid,
                    mode: libc::S_IFDIR as u32 | 0o777,
                };
                object::save_root_fcb(&kv, &root)?;
                object::set_meta(&kv, &root.data_id, object::Metadata::new_now())?;
                object::set_data(&kv, &root.data_id, &[])?;
            }
            Err(e) => return Err(e),
        };
        Ok(Self { kv })
    }

    fn attr_of(fcb: &Fcb, md: &object::Metadata) -> FileAttr {
        FileAttr {
            mode: fcb.mode,
            uid: fcb.uid,
            gid: fcb.gid,
            size: md.size,
            nlinks: md.nlinks,
            atime: md.atime,
            mtime: md.mtime,
            ctime: md.ctime,
        }
    }
}

/// Run `body`, `warn!`-logging `op` and the mapped errno if it fails.
fn traced<T>(op: &'static str, path: &str, body: impl FnOnce() -> FsResult<T>) -> FsResult<T> {
    let result = body();
    if let Err(e) = &result {
        warn!(path, op, errno = e.to_errno(), %e, "operation failed");
    }
    result
}

impl<S: KvStore> Filesystem for KvFilesystem<S> {
    fn getattr(&self, _ctx: RequestContext, path: &str) -> FsResult<FileAttr> {
        trace!(path, "getattr");
        traced("getattr", path, || {
            let fcb = namespace::get_fcb(&self.kv, path)?;
            let md = object::get_meta(&self.kv, &fcb.data_id)?;
            Ok(Self::attr_of(&fcb, &md))
        })
    }

    fn utime(&self, _ctx: RequestContext, path: &str, times: UtimeSpec) -> FsResult<()> {
        debug!(path, "utime");
        traced("utime", path, || {
            let fcb = namespace::get_fcb(&self.kv, path)?;
            let mut md = object::get_meta(&self.kv, &fcb.data_id)?;
            let now = object::now();
            md.atime = times.atime.unwrap_or(now);
            md.mtime = times.mtime.unwrap_or(now);
            object::set_meta(&self.kv, &fcb.data_id, md)
        })
    }

    fn chmod(&self, _ctx: RequestContext, path: &str, mode: u32) -> FsResult<()> {
        debug!(path, mode, "chmod");
        traced("chmod", path, || {
            let mut fcb = namespace::get_fcb(&self.kv, path)?;
            let type_bits = fcb.mode & libc::S_IFMT as u32;
            fcb.mode = type_bits | (mode & !(libc::S_IFMT as u32));
            object::save_fcb(&self.kv, &fcb)?;
            let md = object::get_meta(&self.kv, &fcb.data_id)?;
            object::set_meta(&self.kv, &fcb.data_id, md)
        })
    }

    fn chown(&self, _ctx: RequestContext, path: &str, uid: u32, gid: u32) -> FsResult<()> {
        debug!(path, uid, gid, "chown");
        traced("chown", path, || {
            let mut fcb = namespace::get_fcb(&self.kv, path)?;
            fcb.uid = uid;
            fcb.gid = gid;
            object::save_fcb(&self.kv, &fcb)?;
            let md = object::get_meta(&self.kv, &fcb.data_id)?;
            object::set_meta(&self.kv, &fcb.data_id, md)
        })
    }

    fn open(&self, ctx: RequestContext, path: &str, flags: OpenFlags) -> FsResult<Handle> {
        trace!(path, "open");
        traced("open", path, || {
            let fcb = namespace::get_fcb(&self.kv, path)?;
            permissions::resolve_open(&fcb, flags, ctx)
        })
    }

    fn create(&self, ctx: RequestContext, path: &str, mode: u32, flags: OpenFlags) -> FsResult<Handle> {
        debug!(path, mode, "create");
        traced("create", path, || {
            if flags.0 & libc::O_CREAT == 0 {
                return Err(FsError::Access);
            }
            let (fcb, _) = namespace::attach_to_tree(&self.kv, path, mode | libc::S_IFREG as u32, ctx)?;
            permissions::resolve_open(&fcb, flags, ctx)
        })
    }

    fn read(&self, _ctx: RequestContext, path: &str, handle: &Handle, buf: &mut [u8], offset: u64) -> FsResult<usize> {
        trace!(path, offset, len = buf.len(), "read");
        traced("read", path, || {
            if !handle.can_read() {
                return Err(FsError::Access);
            }
            let fcb = namespace::get_fcb(&self.kv, path)?;
            let mut md = object::get_meta(&self.kv, &fcb.data_id)?;
            if md.size == 0 {
                return Ok(0);
            }
            let blob = object::get_data(&self.kv, &fcb, &md)?;
            if blob.len() as u64 != MAX_FILE_SIZE {
                return Err(FsError::Io);
            }

            let offset = offset as usize;
            let len = md.size as usize;
            if offset >= len {
                return Ok(0);
            }
            let to_copy = buf.len().min(len - offset);
            buf[..to_copy].copy_from_slice(&blob[offset..offset + to_copy]);

            md.atime = object::now();
            object::set_meta(&self.kv, &fcb.data_id, md)?;
            Ok(to_copy)
        })
    }

    fn write(&self, _ctx: RequestContext, path: &str, handle: &Handle, data: &[u8], offset: u64) -> FsResult<usize> {
        debug!(path, offset, len = data.len(), "write");
        traced("write", path, || {
            if !handle.can_write() {
                return Err(FsError::Access);
            }
            let fcb = namespace::get_fcb(&self.kv, path)?;
            let mut md = object::get_meta(&self.kv, &fcb.data_id)?;

            if handle.nonseekable && offset < md.size {
                return Err(FsError::Access);
            }
            // Q3: these EFBIG preconditions run before the offset+size clamp below,
            // so a write starting at MAX_FILE_SIZE - 1 is rejected outright.
            if data.len() as u64 >= MAX_FILE_SIZE || offset >= MAX_FILE_SIZE {
                return Err(FsError::TooBig);
            }

            let mut blob = if md.size > 0 {
                let existing = object::get_data(&self.kv, &fcb, &md)?;
                if existing.len() as u64 != MAX_FILE_SIZE {
                    return Err(FsError::Io);
                }
                existing
            } else {
                vec![0u8; MAX_FILE_SIZE as usize]
            };

            let offset = offset as usize;
            let write_len = data.len().min(MAX_FILE_SIZE as usize - offset);
            blob[offset..offset + write_len].copy_from_slice(&data[..write_len]);
            object::set_data(&self.kv, &fcb.data_id, &blob)?;

            md.size = md.size.max((offset + write_len) as u64);
            md.mtime = object::now();
            md.atime = md.mtime;
            object::set_meta(&self.kv, &fcb.data_id, md)?;
            Ok(write_len)
        })
    }

    fn unlink(&self, _ctx: RequestContext, path: &str) -> FsResult<()> {
        debug!(path, "unlink");
        traced("unlink", path, || {
            let parent = namespace::get_fcb(&self.kv, &namespace::parent_path(path))?;
            let (child, index) = namespace::get_child_fcb(&self.kv, &parent, path)?;
            namespace::detach_from_tree(&self.kv, &parent, &child, index)
        })
    }

    fn truncate(&self, _ctx: RequestContext, path: &str, new_size: u64) -> FsResult<()> {
        debug!(path, new_size, "truncate");
        traced("truncate", path, || {
            if new_size >= MAX_FILE_SIZE {
                return Err(FsError::TooBig);
            }
            let fcb = namespace::get_fcb(&self.kv, path)?;
            let mut md = object::get_meta(&self.kv, &fcb.data_id)?;
            md.size = new_size;
            md.mtime = object::now();
            object::set_meta(&self.kv, &fcb.data_id, md)
        })
    }

    fn mkdir(&self, ctx: RequestContext, path: &str, mode: u32) -> FsResult<()> {
        debug!(path, mode, "mkdir");
        traced("mkdir", path, || {
            let (fcb, _) = namespace::attach_to_tree(&self.kv, path, mode | libc::S_IFDIR as u32, ctx)?;
            object::set_data(&self.kv, &fcb.data_id, &[])
        })
    }

    fn readdir(&self, _ctx: RequestContext, path: &str, handle: &Handle) -> FsResult<Vec<DirEntry>> {
        trace!(path, "readdir");
        traced("readdir", path, || {
            if !handle.can_read() {
                return Err(FsError::Access);
            }
            let fcb = namespace::get_fcb(&self.kv, path)?;
            let mut md = object::get_meta(&self.kv, &fcb.data_id)?;
            let entries = namespace::read_dir_entries(&self.kv, &fcb)?;

            let mut out = vec![
                DirEntry { name: ".".to_string() },
                DirEntry { name: "..".to_string() },
            ];
            for (_, entry_path) in entries {
                let name = entry_path
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or(&entry_path)
                    .to_string();
                out.push(DirEntry { name });
            }

            md.atime = object::now();
            object::set_meta(&self.kv, &fcb.data_id, md)?;
            Ok(out)
        })
    }

    fn rmdir(&self, _ctx: RequestContext, path: &str) -> FsResult<()> {
        debug!(path, "rmdir");
        traced("rmdir", path, || {
            let parent = namespace::get_fcb(&self.kv, &namespace::parent_path(path))?;
            let (child, index) = namespace::get_child_fcb(&self.kv, &parent, path)?;
            let child_md = object::get_meta(&self.kv, &child.data_id)?;
            if child_md.size > 0 {
                return Err(FsError::NotEmpty);
            }
            namespace::detach_from_tree(&self.kv, &parent, &child, index)
        })
    }

    fn link(&self, ctx: RequestContext, existing: &str, new: &str) -> FsResult<()> {
        debug!(existing, new, "link");
        traced("link", existing, || {
            let existing_fcb = namespace::get_fcb(&self.kv, existing)?;
            let existing_md = object::get_meta(&self.kv, &existing_fcb.data_id)?;

            let (mut new_fcb, _) = namespace::attach_to_tree(&self.kv, new, existing_fcb.mode, ctx)?;
            let stray_data_id = new_fcb.data_id;
            new_fcb.data_id = existing_fcb.data_id;
            object::save_fcb(&self.kv, &new_fcb)?;
            object::remove_data(&self.kv, &stray_data_id)?;
            object::remove_meta(&self.kv, &stray_data_id)?;

            let mut md = existing_md;
            md.nlinks += 1;
            object::set_meta(&self.kv, &existing_fcb.data_id, md)
        })
    }

    fn symlink(&self, ctx: RequestContext, target: &str, new: &str) -> FsResult<()> {
        debug!(target, new, "symlink");
        traced("symlink", new, || {
            let mode = libc::S_IRUSR as u32 | libc::S_IWUSR as u32 | libc::S_IFLNK as u32;
            let (new_fcb, _) = namespace::attach_to_tree(&self.kv, new, mode, ctx)?;
            object::set_data(&self.kv, &new_fcb.data_id, target.as_bytes())?;
            let mut md = object::get_meta(&self.kv, &new_fcb.data_id)?;
            md.size = target.len() as u64;
            object::set_meta(&self.kv, &new_fcb.data_id, md)
        })
    }

    fn readlink(&self, _ctx: RequestContext, path: &str) -> FsResult<String> {
        trace!(path, "readlink");
        traced("readlink", path, || {
            let fcb = namespace::get_fcb(&self.kv, path)?;
            if fcb.mode & libc::S_IFMT as u32 != libc::S_IFLNK as u32 {
                return Err(FsError::NotASymlink);
            }
            let md = object::get_meta(&self.kv, &fcb.data_id)?;
            let bytes = object::get_data(&self.kv, &fcb, &md)?;
            String::from_utf8(bytes).map_err(|_| FsError::Io)
        })
    }

    fn rename(&self, ctx: RequestContext, from: &str, to: &str) -> FsResult<()> {
        debug!(from, to, "rename");
        traced("rename", from, || {
            if namespace::get_fcb(&self.kv, to).is_ok() {
                self.unlink(ctx, to)?;
            }
            self.link(ctx, from, to)?;
            self.unlink(ctx, from)
        })
    }

    fn flush(&self, _ctx: RequestContext, path: &str, _handle: &Handle) -> FsResult<()> {
        trace!(path, "flush");
        Ok(())
    }

    fn release(&self, _ctx: RequestContext, path: &str, _handle: &Handle) -> FsResult<()> {
        trace!(path, "release");
        Ok(())
    }
}
