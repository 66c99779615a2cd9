use std::time::Duration;

use runbake_fs::{
    AtomicWriteOptions, CacheLock, DiskFs, FileSystem, atomic_read, atomic_write, copy_file,
    ensure_dir,
};
use tempfile::tempdir;

#[test]
fn test_atomic_write_replaces_existing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("existing.txt");
    std::fs::write(&path, "original").unwrap();

    atomic_write(&path, b"new content", AtomicWriteOptions::new()).unwrap();

    assert_eq!(atomic_read(&path).unwrap(), b"new content");
}

#[tokio::test]
async fn test_ensure_dir_then_lock_then_write() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache").join("4.2.1");
    ensure_dir(&cache).unwrap();

    let lock = CacheLock::acquire(&cache, Duration::from_secs(1))
        .await
        .unwrap();
    DiskFs.write(&cache.join("marker"), b"x").unwrap();
    drop(lock);

    assert!(cache.join("marker").exists());
    assert!(cache.join(CacheLock::LOCK_FILENAME).exists());
}

#[test]
fn test_ensure_dir_under_regular_file_fails() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain");
    std::fs::write(&file, "not a directory").unwrap();

    let err = ensure_dir(file.join("sub")).unwrap_err();
    assert!(matches!(err, runbake_fs::Error::CreateDir { .. }));
}

#[cfg(unix)]
#[test]
fn test_copy_file_preserves_executable_bit() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let src = dir.path().join("node");
    std::fs::write(&src, b"\x7fELF").unwrap();
    std::fs::set_permissions(&src, std::fs::Permissions::from_mode(0o755)).unwrap();

    let dest = dir.path().join("dist").join("app");
    copy_file(&src, &dest).unwrap();

    let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
}
