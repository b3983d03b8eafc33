use kvfs_core::Filesystem;

use crate::common::Fixture;

/// Scenario 1: mount on empty store.
#[test]
fn root_attrs_on_a_fresh_mount() {
    let f = Fixture::new();
    let attr = f.fs.getattr(f.ctx, "/").unwrap();
    assert_eq!(attr.mode & libc::S_IFMT as u32, libc::S_IFDIR as u32);
    assert_eq!(attr.size, 0);
    assert_eq!(attr.nlinks, 1);
}

#[test]
fn lookup_of_missing_path_is_enoent() {
    let f = Fixture::new();
    let err = f.fs.getattr(f.ctx, "/nope").unwrap_err();
    assert_eq!(err.to_errno(), libc::ENOENT);
}

#[test]
fn lookup_through_a_non_directory_is_enotdir() {
    let f = Fixture::new();
    f.fs
        .create(f.ctx, "/f", 0o644, kvfs_core::OpenFlags(libc::O_RDWR | libc::O_CREAT))
        .unwrap();
    let err = f.fs.getattr(f.ctx, "/f/child").unwrap_err();
    assert_eq!(err.to_errno(), libc::ENOTDIR);
}
