use kvfs_core::{Filesystem, OpenFlags};

use crate::common::{other_ctx, Fixture};

#[test]
fn owner_only_mode_denies_other_writers() {
    let f = Fixture::new();
    f.fs.create(f.ctx, "/f", 0o600, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();

    let err = f.fs.open(other_ctx(), "/f", OpenFlags(libc::O_WRONLY)).unwrap_err();
    assert_eq!(err.to_errno(), libc::EACCES);
}

#[test]
fn other_can_read_world_readable_file() {
    let f = Fixture::new();
    f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();

    let h = f.fs.open(other_ctx(), "/f", OpenFlags(libc::O_RDONLY)).unwrap();
    assert!(h.can_read());
}

#[test]
fn read_without_a_read_grant_on_the_handle_is_denied() {
    let f = Fixture::new();
    let h = f.fs.create(f.ctx, "/f", 0o600, OpenFlags(libc::O_WRONLY | libc::O_CREAT)).unwrap();
    let mut buf = [0u8; 4];
    let err = f.fs.read(f.ctx, "/f", &h, &mut buf, 0).unwrap_err();
    assert_eq!(err.to_errno(), libc::EACCES);
}

#[test]
fn append_only_handle_rejects_writes_before_the_current_end() {
    let f = Fixture::new();
    let h = f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    f.fs.write(f.ctx, "/f", &h, b"hello", 0).unwrap();

    let append_h = f.fs.open(f.ctx, "/f", OpenFlags(libc::O_WRONLY | libc::O_APPEND)).unwrap();
    let err = f.fs.write(f.ctx, "/f", &append_h, b"x", 0).unwrap_err();
    assert_eq!(err.to_errno(), libc::EACCES);

    assert_eq!(f.fs.write(f.ctx, "/f", &append_h, b"!", 5).unwrap(), 1);
}

#[test]
fn create_requires_a_create_grant() {
    let f = Fixture::new();
    let err = f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR)).unwrap_err();
    assert_eq!(err.to_errno(), libc::EACCES);
}
