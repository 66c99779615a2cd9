use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Create `path` and any missing ancestors.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| Error::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy a single file, creating the destination's parent directory first.
///
/// Returns the number of bytes copied.
pub fn copy_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    fs::copy(src, dest).map_err(|e| Error::Copy {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    })
}

/// Move every top-level entry of `src` into `dest`.
///
/// Entries already present in `dest` are left alone and the staged copy is
/// discarded with `src`.
pub fn move_entries(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<usize> {
    let src = src.as_ref();
    let dest = dest.as_ref();
    let mut moved = 0;

    for entry in fs::read_dir(src).map_err(|e| Error::Read {
        path: src.to_path_buf(),
        source: e,
    })? {
        let entry = entry.map_err(|e| Error::Read {
            path: src.to_path_buf(),
            source: e,
        })?;
        let target = dest.join(entry.file_name());
        if target.exists() {
            continue;
        }
        fs::rename(entry.path(), &target).map_err(|e| Error::Copy {
            from: entry.path(),
            to: target.clone(),
            source: e,
        })?;
        moved += 1;
    }

    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_copy_file_creates_parent() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dest = dir.path().join("out").join("nested").join("dest.bin");
        fs::write(&src, b"binary").unwrap();

        let copied = copy_file(&src, &dest).unwrap();
        assert_eq!(copied, 6);
        assert_eq!(fs::read(&dest).unwrap(), b"binary");
    }

    #[test]
    fn test_copy_file_missing_source() {
        let dir = tempdir().unwrap();
        let err = copy_file(dir.path().join("nope"), dir.path().join("dest")).unwrap_err();
        assert!(matches!(err, Error::Copy { .. }));
    }

    #[test]
    fn test_move_entries_skips_existing() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("staging");
        let dest = dir.path().join("dest");
        fs::create_dir_all(staging.join("node-v1")).unwrap();
        fs::write(staging.join("node-v1").join("file"), b"new").unwrap();
        fs::create_dir_all(staging.join("other")).unwrap();
        fs::create_dir_all(dest.join("other")).unwrap();

        let moved = move_entries(&staging, &dest).unwrap();
        assert_eq!(moved, 1);
        assert_eq!(fs::read(dest.join("node-v1").join("file")).unwrap(), b"new");
    }
}
