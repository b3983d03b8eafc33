//! Open-time permission resolution (spec §4.5).
//!
//! `resolve_open` is the only place a mode/uid/gid triple gets turned into a
//! grant; every later read/write/readdir call only ever inspects the
//! resulting [`Handle`], never the FCB's raw mode again.

use crate::context::RequestContext;
use crate::error::{FsError, FsResult};
use crate::object::Fcb;

/// Marks that a handle has been through `resolve_open` at least once.
const OPEN_CALLED: u32 = 1;

/// `O_CREAT`'s value, the only bit OR'd into `fh` above the access mode.
const FH_CREATE: u32 = libc::O_CREAT as u32;

/// The flags `open`/`create` is invoked with: the libc `O_*` bits, plus
/// optionally one of `S_IFDIR`/`S_IFREG`/`S_IFLNK` to assert an expected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags(pub i32);

impl OpenFlags {
    fn type_bits(self) -> u32 {
        self.0 as u32 & libc::S_IFMT as u32
    }

    fn has(self, bit: i32) -> bool {
        self.0 & bit != 0
    }
}

/// The per-open grant an operation table entry carries forward, the Rust
/// analogue of `fi->fh` / `fi->fh_old` / `fi->nonseekable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    fh: u32,
    fh_old: u32,
    pub nonseekable: bool,
}

impl Handle {
    fn opened(self) -> bool {
        self.fh_old & OPEN_CALLED != 0
    }

    /// `fh % 2 == 0` (even low bit) is the read grant, per `O_ACCMODE` layout
    /// (`RDONLY=0`, `WRONLY=1`, `RDWR=2`).
    pub fn can_read(self) -> bool {
        self.opened() && self.fh % 2 == 0
    }

    /// `fh % 4 != 0` is the write grant (`WRONLY`/`RDWR`, never `RDONLY`).
    pub fn can_write(self) -> bool {
        self.opened() && self.fh % 4 != 0
    }

    pub fn has_create_grant(self) -> bool {
        self.opened() && self.fh & FH_CREATE != 0
    }
}

/// Run the open-time permission procedure for `flags` against `fcb`,
/// producing the handle that later reads/writes must present.
pub fn resolve_open(fcb: &Fcb, flags: OpenFlags, ctx: RequestContext) -> FsResult<Handle> {
    let fcb_type = fcb.mode & libc::S_IFMT as u32;
    let mut working = flags.0;

    match flags.type_bits() {
        t if t == libc::S_IFDIR as u32 => {
            if fcb_type != libc::S_IFDIR as u32 {
                return Err(FsError::NotADirectory);
            }
            working &= !(libc::S_IFDIR as i32);
        }
        t if t == libc::S_IFREG as u32 => {
            if fcb_type != libc::S_IFREG as u32 {
                return Err(FsError::IsADirectory);
            }
            working &= !(libc::S_IFREG as i32);
        }
        t if t == libc::S_IFLNK as u32 => {
            if fcb_type != libc::S_IFLNK as u32 {
                return Err(FsError::NotASymlink);
            }
            working &= !(libc::S_IFLNK as i32);
        }
        _ => {}
    }
    let flags = OpenFlags(working);

    let (can_r, can_w, can_x) = if ctx.uid == fcb.uid {
        (fcb.mode & libc::S_IRUSR as u32 != 0, fcb.mode & libc::S_IWUSR as u32 != 0, fcb.mode & libc::S_IXUSR as u32 != 0)
    } else if ctx.gid == fcb.gid {
        (fcb.mode & libc::S_IRGRP as u32 != 0, fcb.mode & libc::S_IWGRP as u32 != 0, fcb.mode & libc::S_IXGRP as u32 != 0)
    } else {
        (fcb.mode & libc::S_IROTH as u32 != 0, fcb.mode & libc::S_IWOTH as u32 != 0, fcb.mode & libc::S_IXOTH as u32 != 0)
    };
    let _ = can_x; // execute bit is not checked by any operation this core exposes

    let mut fh = (flags.0 & libc::O_ACCMODE) as u32;
    if fh % 2 == 0 && !can_r {
        return Err(FsError::Access);
    }
    if fh > 0 && !can_w {
        return Err(FsError::Access);
    }

    let mut nonseekable = false;
    if flags.has(libc::O_APPEND) {
        if !can_w {
            return Err(FsError::Access);
        }
        nonseekable = true;
    }

    if flags.has(libc::O_CREAT) {
        if !can_w {
            return Err(FsError::Access);
        }
        fh |= FH_CREATE;
    }

    Ok(Handle { fh, fh_old: OPEN_CALLED, nonseekable })
}
