//! The VFS operation surface (spec §4.4), generalized from the teacher's
//! `async_trait` NFSv3 `Vfs` trait to the synchronous, single-dispatch
//! operation table this core's concurrency model calls for (spec §5).

use crate::context::RequestContext;
use crate::error::FsResult;
use crate::permissions::{Handle, OpenFlags};

/// The attributes `getattr` reports, assembled from an FCB plus its
/// metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileAttr {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub nlinks: u32,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
}

/// One entry handed to a `readdir` filler, trailing path component only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
}

/// Either side of `utime`'s optional time arguments; `None` on both means
/// "set both to now", matching `utime(path, NULL)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtimeSpec {
    pub atime: Option<i64>,
    pub mtime: Option<i64>,
}

/// The operation table a VFS gateway dispatches kernel requests against.
///
/// Every method takes the acting [`RequestContext`] explicitly (spec §9 Q5)
/// rather than reading it from thread-local or global state.
pub trait Filesystem {
    fn getattr(&self, ctx: RequestContext, path: &str) -> FsResult<FileAttr>;

    fn utime(&self, ctx: RequestContext, path: &str, times: UtimeSpec) -> FsResult<()>;

    fn chmod(&self, ctx: RequestContext, path: &str, mode: u32) -> FsResult<()>;

    fn chown(&self, ctx: RequestContext, path: &str, uid: u32, gid: u32) -> FsResult<()>;

    fn open(&self, ctx: RequestContext, path: &str, flags: OpenFlags) -> FsResult<Handle>;

    /// Preconditioned on `flags` carrying `O_CREAT`; attaches a new regular
    /// file and resolves the same `flags` into the returned handle.
    fn create(&self, ctx: RequestContext, path: &str, mode: u32, flags: OpenFlags) -> FsResult<Handle>;

    fn read(&self, ctx: RequestContext, path: &str, handle: &Handle, buf: &mut [u8], offset: u64) -> FsResult<usize>;

    fn write(&self, ctx: RequestContext, path: &str, handle: &Handle, data: &[u8], offset: u64) -> FsResult<usize>;

    fn unlink(&self, ctx: RequestContext, path: &str) -> FsResult<()>;

    /// Logical-size-only truncate; bytes beyond the new length are not
    /// zeroed in the blob (spec §9 Q4, preserved deliberately).
    fn truncate(&self, ctx: RequestContext, path: &str, new_size: u64) -> FsResult<()>;

    fn mkdir(&self, ctx: RequestContext, path: &str, mode: u32) -> FsResult<()>;

    fn readdir(&self, ctx: RequestContext, path: &str, handle: &Handle) -> FsResult<Vec<DirEntry>>;

    fn rmdir(&self, ctx: RequestContext, path: &str) -> FsResult<()>;

    fn link(&self, ctx: RequestContext, existing: &str, new: &str) -> FsResult<()>;

    fn symlink(&self, ctx: RequestContext, target: &str, new: &str) -> FsResult<()>;

    fn readlink(&self, ctx: RequestContext, path: &str) -> FsResult<String>;

    fn rename(&self, ctx: RequestContext, from: &str, to: &str) -> FsResult<()>;

    fn flush(&self, ctx: RequestContext, path: &str, handle: &Handle) -> FsResult<()>;

    fn release(&self, ctx: RequestContext, path: &str, handle: &Handle) -> FsResult<()>;
}
