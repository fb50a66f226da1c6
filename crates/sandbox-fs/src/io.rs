//! Whole-file reads and atomic, locked writes

use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Replace `path` with `content` in one step.
///
/// The bytes go to a locked sibling file which is synced and then renamed
/// over `path`, so readers see either the old or the new content. On any
/// failure the sibling is removed and `path` is left untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let staged = staging_path(path);
    let result = stage(&staged, path, content)
        .and_then(|()| fs::rename(&staged, path).map_err(|e| Error::io(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&staged);
    }
    result
}

/// Hidden sibling of `path`, unique per process and call.
fn staging_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sequence = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{file_name}.{}.{sequence}.tmp", std::process::id()))
}

fn stage(staged: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(staged)
        .map_err(|e| Error::io(staged, e))?;

    let lock_failed = |_| Error::LockFailed {
        path: target.to_path_buf(),
    };
    file.lock_exclusive().map_err(lock_failed)?;
    file.write_all(content).map_err(|e| Error::io(staged, e))?;
    file.sync_all().map_err(|e| Error::io(staged, e))?;
    file.unlock().map_err(lock_failed)
}

/// Read a whole UTF-8 file, reporting its path on failure.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// [`write_atomic`] for text.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_text_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/file.txt");

        write_text(&path, "hello").unwrap();

        assert_eq!(read_text(&path).unwrap(), "hello");
    }

    #[test]
    fn staging_path_is_a_hidden_sibling() {
        let first = staging_path(Path::new("/home/.gitconfig"));
        let second = staging_path(Path::new("/home/.gitconfig"));

        assert_eq!(first.parent(), Some(Path::new("/home")));
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("..gitconfig."));
        assert!(name.ends_with(".tmp"));
        assert_ne!(first, second);
    }

    #[test]
    fn read_text_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = read_text(&path).unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
    }
}
