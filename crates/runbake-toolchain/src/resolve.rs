use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Pick the extracted source directory inside `version_dir`.
///
/// Hidden entries (staging directories, the lock file) are ignored. With
/// several candidates the last one in name order wins; callers should not
/// rely on which.
pub fn find_source_dir(version_dir: &Path) -> Result<Option<PathBuf>> {
    let list_err = |e| Error::List {
        path: version_dir.to_path_buf(),
        source: e,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(version_dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type().map_err(list_err)?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs.pop())
}
