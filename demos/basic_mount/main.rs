//! Thin demo binary: wires CLI/config, logging and the in-memory `KvStore`
//! into a mounted [`KvFilesystem`], then exercises a few operations.
//!
//! The real VFS gateway and the real embedded KV store are out of scope for
//! this crate (see `SPEC_FULL.md` §1); this binary stands in for both so
//! the library's wiring has somewhere to run.

use clap::Parser;
use tracing::info;

use kvfs_core::{Filesystem, KvFilesystem, MemKvStore, MountConfig, OpenFlags, RequestContext};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = MountConfig::parse();
    if let Some(path) = config.config_file.clone() {
        config = config.merge_file(&path).unwrap_or_else(|e| {
            eprintln!("failed to read config file {}: {e}", path.display());
            std::process::exit(1);
        });
    }

    let uid = config.uid.unwrap_or_else(|| unsafe { libc::getuid() });
    let gid = config.gid.unwrap_or_else(|| unsafe { libc::getgid() });

    info!(db_path = %config.db_path.display(), uid, gid, "mounting");
    let fs = KvFilesystem::mount(MemKvStore::open_with_create(), uid, gid)
        .expect("mount on a fresh in-memory store cannot fail");

    let ctx = RequestContext::new(uid, gid);
    fs.mkdir(ctx, "/demo", 0o755).expect("mkdir /demo");
    let handle = fs
        .create(ctx, "/demo/hello.txt", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT))
        .expect("create /demo/hello.txt");
    fs.write(ctx, "/demo/hello.txt", &handle, b"hello, kvfs\n", 0).expect("write");

    let mut buf = [0u8; 32];
    let n = fs.read(ctx, "/demo/hello.txt", &handle, &mut buf, 0).expect("read");
    info!(bytes = n, contents = %String::from_utf8_lossy(&buf[..n]), "read back");
}
