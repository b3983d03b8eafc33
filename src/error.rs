//! The error taxonomy shared by every layer of the core (spec §7).
//!
//! Inner helpers return `Result<_, FsError>` and propagate with `?`; only the
//! `Filesystem` trait boundary converts an `FsError` into the negated errno a
//! VFS gateway expects.

use std::fmt;

use crate::kv::KvError;

/// Convenient result alias used throughout the core.
pub type FsResult<T> = Result<T, FsError>;

/// Errors the core can return, named after the POSIX errno they represent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FsError {
    /// `ENOENT` — path not found at any resolution step.
    NotFound,
    /// `ENOTDIR` — path traversal reached a non-directory expected to be one.
    NotADirectory,
    /// `EISDIR` — open-flag type mismatch, directory found where a non-directory was required.
    IsADirectory,
    /// `ENOLINK` — open-flag type mismatch, symlink found where a non-symlink was required.
    NotASymlink,
    /// `EACCES` — permission check failure.
    Access,
    /// `EFBIG` — write or truncate would exceed `MAX_FILE_SIZE`.
    TooBig,
    /// `ENAMETOOLONG` — path at or beyond `MAX_PATH`.
    NameTooLong,
    /// `ENOTEMPTY` — rmdir on a non-empty directory.
    NotEmpty,
    /// `ENOMEM` — KV store allocation failure.
    OutOfMemory,
    /// `EIO` — any other KV failure, short reads, or malformed stored records.
    Io,
}

impl FsError {
    /// Map to the positive libc errno value the gateway boundary negates.
    pub fn to_errno(self) -> i32 {
        match self {
            FsError::NotFound => libc::ENOENT,
            FsError::NotADirectory => libc::ENOTDIR,
            FsError::IsADirectory => libc::EISDIR,
            FsError::NotASymlink => libc::ENOLINK,
            FsError::Access => libc::EACCES,
            FsError::TooBig => libc::EFBIG,
            FsError::NameTooLong => libc::ENAMETOOLONG,
            FsError::NotEmpty => libc::ENOTEMPTY,
            FsError::OutOfMemory => libc::ENOMEM,
            FsError::Io => libc::EIO,
        }
    }

    /// Negated errno, the value a `Filesystem` operation returns to its caller.
    pub fn to_negated_errno(self) -> i32 {
        -self.to_errno()
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FsError::NotFound => "ENOENT",
            FsError::NotADirectory => "ENOTDIR",
            FsError::IsADirectory => "EISDIR",
            FsError::NotASymlink => "ENOLINK",
            FsError::Access => "EACCES",
            FsError::TooBig => "EFBIG",
            FsError::NameTooLong => "ENAMETOOLONG",
            FsError::NotEmpty => "ENOTEMPTY",
            FsError::OutOfMemory => "ENOMEM",
            FsError::Io => "EIO",
        };
        f.write_str(name)
    }
}

impl std::error::Error for FsError {}

impl From<KvError> for FsError {
    fn from(err: KvError) -> Self {
        match err {
            KvError::NotFound => FsError::NotFound,
            KvError::OutOfMemory => FsError::OutOfMemory,
            KvError::Io => FsError::Io,
        }
    }
}
