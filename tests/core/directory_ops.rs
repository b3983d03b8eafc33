use kvfs_core::{Filesystem, OpenFlags};

use crate::common::Fixture;

/// Scenario 2: `mkdir("/a", 0755) ; mkdir("/a/b", 0755) ; readdir("/a")`.
#[test]
fn readdir_yields_dots_and_the_child() {
    let f = Fixture::new();
    f.fs.mkdir(f.ctx, "/a", 0o755).unwrap();
    f.fs.mkdir(f.ctx, "/a/b", 0o755).unwrap();

    let h = f.fs.open(f.ctx, "/a", OpenFlags(libc::O_RDONLY | libc::S_IFDIR as i32)).unwrap();
    let names: Vec<String> = f.fs.readdir(f.ctx, "/a", &h).unwrap().into_iter().map(|e| e.name).collect();

    assert!(names.contains(&".".to_string()));
    assert!(names.contains(&"..".to_string()));
    assert!(names.contains(&"b".to_string()));
    assert_eq!(names.len(), 3);
}

/// P2: a directory's metadata `size` matches its entry count, and every
/// entry's path is rooted at the directory's own path.
#[test]
fn directory_size_tracks_entry_count() {
    let f = Fixture::new();
    f.fs.mkdir(f.ctx, "/a", 0o755).unwrap();
    f.fs.mkdir(f.ctx, "/a/b", 0o755).unwrap();
    f.fs.mkdir(f.ctx, "/a/c", 0o755).unwrap();
    let attr = f.fs.getattr(f.ctx, "/a").unwrap();
    assert_eq!(attr.size, 2);
}

/// Scenario 8 / P6: `rmdir` on a non-empty directory is rejected; once
/// empty, `mkdir ; rmdir` returns the namespace to its prior state.
#[test]
fn rmdir_requires_empty_directory() {
    let f = Fixture::new();
    f.fs.mkdir(f.ctx, "/a", 0o755).unwrap();
    f.fs.mkdir(f.ctx, "/a/b", 0o755).unwrap();

    let err = f.fs.rmdir(f.ctx, "/a").unwrap_err();
    assert_eq!(err.to_errno(), libc::ENOTEMPTY);

    f.fs.rmdir(f.ctx, "/a/b").unwrap();
    f.fs.rmdir(f.ctx, "/a").unwrap();

    assert!(f.fs.getattr(f.ctx, "/a").is_err());
    let root_after = f.fs.getattr(f.ctx, "/").unwrap();
    assert_eq!(root_after.size, 0);
}
