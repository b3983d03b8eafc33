use kvfs_core::{Filesystem, OpenFlags};

use crate::common::Fixture;

/// Scenario 5: `symlink("/f", "/l") ; readlink("/l")` yields the target.
#[test]
fn readlink_returns_the_symlink_target() {
    let f = Fixture::new();
    f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    f.fs.symlink(f.ctx, "/f", "/l").unwrap();

    assert_eq!(f.fs.readlink(f.ctx, "/l").unwrap(), "/f");
    assert_eq!(f.fs.getattr(f.ctx, "/l").unwrap().size, 2);
}

#[test]
fn readlink_on_a_non_symlink_is_enolink() {
    let f = Fixture::new();
    f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    let err = f.fs.readlink(f.ctx, "/f").unwrap_err();
    assert_eq!(err.to_errno(), libc::ENOLINK);
}

#[test]
fn opening_a_symlink_as_a_regular_file_is_rejected() {
    let f = Fixture::new();
    f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    f.fs.symlink(f.ctx, "/f", "/l").unwrap();

    let err = f.fs.open(f.ctx, "/l", OpenFlags(libc::O_RDONLY | libc::S_IFREG as i32)).unwrap_err();
    assert_eq!(err.to_errno(), libc::EISDIR);
}
