//! Shared filesystem helpers.

use std::{
    fs::{OpenOptions, copy, create_dir_all, remove_dir_all},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::{Pattern, glob};

/// Find files matching a glob pattern in a directory, in sorted order.
pub fn glob_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir_str = dir.to_str().context("Invalid pattern path")?;
    let pattern = Path::new(&Pattern::escape(dir_str)).join(pattern);
    let pattern_str = pattern.to_str().context("Invalid pattern path")?;
    Ok(glob(pattern_str)
        .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
        .filter_map(|entry| entry.ok())
        .collect())
}

/// Remove a directory tree if present and create it empty.
pub fn recreate_dir(dir: &Path) -> Result<()> {
    remove_dir_if_exists(dir)?;
    create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))
}

/// Remove a directory tree. Returns whether anything was removed.
pub fn remove_dir_if_exists(dir: &Path) -> Result<bool> {
    match remove_dir_all(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove directory: {}", dir.display())),
    }
}

/// Create `path` with `contents` unless it already exists.
///
/// An existing file is never touched. Returns whether the file was written.
pub fn create_if_absent(path: &Path, contents: impl AsRef<[u8]>) -> Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("Failed to create {}", path.display())),
    };
    file.write_all(contents.as_ref())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

/// Copy `src` to `dest` unless `dest` already exists.
///
/// The first copy wins; later calls leave `dest` as it is. Returns whether a
/// copy was made.
pub fn copy_if_absent(src: &Path, dest: &Path) -> Result<bool> {
    if dest.exists() {
        return Ok(false);
    }
    copy(src, dest)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::fs::{read_to_string, write};

    use super::*;

    #[test]
    fn create_if_absent_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marker");

        assert!(create_if_absent(&path, "first").unwrap());
        assert!(!create_if_absent(&path, "second").unwrap());
        assert_eq!(read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn copy_if_absent_is_first_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let dest = dir.path().join("dest.txt");
        write(&a, "A").unwrap();
        write(&b, "B").unwrap();

        assert!(copy_if_absent(&a, &dest).unwrap());
        assert!(!copy_if_absent(&b, &dest).unwrap());
        assert!(!copy_if_absent(&a, &dest).unwrap());
        assert_eq!(read_to_string(&dest).unwrap(), "A");
    }

    #[test]
    fn copy_if_absent_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(copy_if_absent(&dir.path().join("nope"), &dir.path().join("dest")).is_err());
    }

    #[test]
    fn recreate_dir_empties_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("scratch");
        create_dir_all(scratch.join("nested")).unwrap();
        write(scratch.join("stale.glyphs"), "").unwrap();

        recreate_dir(&scratch).unwrap();
        assert!(scratch.is_dir());
        assert_eq!(scratch.read_dir().unwrap().count(), 0);
    }

    #[test]
    fn remove_missing_dir_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!remove_dir_if_exists(&dir.path().join("missing")).unwrap());
    }

    #[test]
    fn glob_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.ttf", "a.ttf", "c.txt"] {
            write(dir.path().join(name), "").unwrap();
        }
        let found = glob_files(dir.path(), "*.ttf").unwrap();
        assert_eq!(found, vec![dir.path().join("a.ttf"), dir.path().join("b.ttf")]);
    }
}
