//! Filesystem helpers: deterministic directory listing and atomic writes.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// List files in a directory with the given extension, sorted by file name.
///
/// Sorting makes the processing order deterministic across platforms,
/// which in turn fixes the order of generated case statements.
pub fn read_dir_sorted(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Write a file atomically: write to a sibling temp path, then rename.
///
/// A crash mid-write leaves either the old content or the fully new
/// content, never a truncated file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, contents)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to rename {} into place", tmp.display()))?;
    Ok(())
}

/// Sibling temp path for atomic writes (same directory, so rename stays
/// on one filesystem).
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// File name without its extension, as a string.
pub fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_sorted_filters_and_orders() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.svg"), "b").unwrap();
        fs::write(dir.path().join("a.svg"), "a").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = read_dir_sorted(dir.path(), "svg").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.svg", "b.svg"]);
    }

    #[test]
    fn test_read_dir_sorted_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = read_dir_sorted(&dir.path().join("missing"), "svg");
        assert!(result.is_err());
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.svg");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        // No temp file left behind
        assert!(!dir.path().join("icon.svg.tmp").exists());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("icons/arrow-left.svg")), Some("arrow-left"));
        assert_eq!(file_stem(Path::new("no_ext")), Some("no_ext"));
    }
}
