//! A POSIX-like filesystem core persisted in an embedded ordered key-value
//! store: object model, path resolver, and permission layer. The VFS
//! gateway that bridges kernel filesystem calls to this core's operation
//! table is an external collaborator (see [`vfs::Filesystem`]).

mod adapter;
mod config;
mod context;
mod error;
mod filesystem;
mod kv;
mod namespace;
mod object;
mod permissions;
mod vfs;

pub use config::MountConfig;
pub use context::RequestContext;
pub use error::{FsError, FsResult};
pub use filesystem::KvFilesystem;
pub use kv::{KvError, KvStore, MemKvStore};
pub use object::{DENTRY_SIZE, KEY_SIZE, MAX_FILE_SIZE, MAX_PATH};
pub use permissions::{Handle, OpenFlags};
pub use vfs::{DirEntry, FileAttr, Filesystem, UtimeSpec};
