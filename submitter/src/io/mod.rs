//! Filesystem helpers for the history and configuration files.

pub mod config;
pub mod history_file;

use std::fs;
use std::io;
use std::path::Path;

/// Write `contents` next to `path` under a `.tmp` suffix, then rename over `path`.
///
/// Missing parent directories are created first. The temp file is removed
/// when the rename fails.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);
    fs::write(tmp_path, contents)?;
    if let Err(err) = fs::rename(tmp_path, path) {
        let _ = fs::remove_file(tmp_path);
        return Err(err);
    }
    Ok(())
}
