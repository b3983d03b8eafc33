use kvfs_core::{Filesystem, OpenFlags};

use crate::common::Fixture;

#[test]
fn unlink_twice_returns_enoent_on_the_second_call() {
    let f = Fixture::new();
    f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    f.fs.unlink(f.ctx, "/f").unwrap();
    let err = f.fs.unlink(f.ctx, "/f").unwrap_err();
    assert_eq!(err.to_errno(), libc::ENOENT);
}

/// P4: `nlinks` tracks live references exactly through link/unlink churn.
#[test]
fn nlinks_tracks_live_references_through_link_and_unlink() {
    let f = Fixture::new();
    f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    f.fs.link(f.ctx, "/f", "/g").unwrap();
    f.fs.link(f.ctx, "/f", "/h").unwrap();
    assert_eq!(f.fs.getattr(f.ctx, "/f").unwrap().nlinks, 3);

    f.fs.unlink(f.ctx, "/g").unwrap();
    assert_eq!(f.fs.getattr(f.ctx, "/f").unwrap().nlinks, 2);

    f.fs.unlink(f.ctx, "/f").unwrap();
    f.fs.unlink(f.ctx, "/h").unwrap();
    assert!(f.fs.getattr(f.ctx, "/h").is_err());
}

/// Q1: once the last link to a file is gone, a fresh file created at the
/// same name starts from a clean slate (the old FCB/metadata/blob are
/// fully reclaimed, not just unreachable).
#[test]
fn recreating_a_fully_unlinked_path_starts_empty() {
    let f = Fixture::new();
    let h = f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    f.fs.write(f.ctx, "/f", &h, b"hello", 0).unwrap();
    f.fs.unlink(f.ctx, "/f").unwrap();

    f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    let attr = f.fs.getattr(f.ctx, "/f").unwrap();
    assert_eq!(attr.size, 0);
    assert_eq!(attr.nlinks, 1);
}
