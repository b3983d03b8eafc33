use kvfs_core::{Filesystem, OpenFlags};

use crate::common::Fixture;

#[test]
fn rename_moves_a_file_to_a_new_name() {
    let f = Fixture::new();
    let h = f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    f.fs.write(f.ctx, "/f", &h, b"hello", 0).unwrap();

    f.fs.rename(f.ctx, "/f", "/g").unwrap();

    assert!(f.fs.getattr(f.ctx, "/f").is_err());
    let attr = f.fs.getattr(f.ctx, "/g").unwrap();
    assert_eq!(attr.size, 5);
    assert_eq!(attr.nlinks, 1);
}

/// `rename` over an existing destination replaces it.
#[test]
fn rename_over_an_existing_destination_replaces_it() {
    let f = Fixture::new();
    let h1 = f.fs.create(f.ctx, "/f", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    f.fs.write(f.ctx, "/f", &h1, b"aaaaa", 0).unwrap();
    let h2 = f.fs.create(f.ctx, "/g", 0o644, OpenFlags(libc::O_RDWR | libc::O_CREAT)).unwrap();
    f.fs.write(f.ctx, "/g", &h2, b"bb", 0).unwrap();

    f.fs.rename(f.ctx, "/f", "/g").unwrap();

    let mut buf = [0u8; 5];
    let hg = f.fs.open(f.ctx, "/g", OpenFlags(libc::O_RDONLY)).unwrap();
    f.fs.read(f.ctx, "/g", &hg, &mut buf, 0).unwrap();
    assert_eq!(&buf, b"aaaaa");
}
