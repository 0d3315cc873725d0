//! Filesystem helpers for the intercept engine built on `cap-std` and
//! `camino`.
//!
//! Paths arrive from the command line and configuration as UTF-8. Every
//! helper resolves them against an ambient directory capability so callers
//! never touch `std::fs` directly.
#![forbid(unsafe_code)]

use std::io;
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path for reading using ambient authority.
///
/// # Errors
/// Propagates the I/O error from opening the file.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Open the parent directory of `path` and return it with the file name.
///
/// # Errors
/// Fails when `path` has no file name or the parent cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("path '{path}' has no file name")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Create the parent directories of `path` when missing.
///
/// # Errors
/// Propagates failures to open the base directory or create the parents.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Whether `path` names a regular file rather than a directory or other
/// entry.
///
/// # Errors
/// Returns an [`io::ErrorKind::NotFound`] error when the path or its parent
/// does not exist, and propagates other I/O failures.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Split a directory path into an ambient base directory and the relative
/// remainder below it.
///
/// Absolute paths are anchored at the root (or drive prefix on Windows) and
/// relative paths at the current directory.
///
/// # Errors
/// Fails when the base cannot be opened or the path is not UTF-8 after
/// splitting.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let (base, relative) = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative = Utf8PathBuf::from_path_buf(relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("temporary directory")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp path")
    }

    #[rstest]
    fn opens_written_files(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("modes.json");
        std::fs::write(&path, "{}").expect("write fixture");
        let mut contents = String::new();
        open_utf8_file(&path)
            .expect("open")
            .read_to_string(&mut contents)
            .expect("read");
        assert_eq!(contents, "{}");
    }

    #[rstest]
    fn creates_nested_parents(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("a/b/candidates.db");
        ensure_parent_dir(&path).expect("create parents");
        assert!(path.parent().expect("parent").is_dir());
    }

    #[rstest]
    fn distinguishes_files_from_directories_and_absence(temp_dir: TempDir) {
        let root = utf8(&temp_dir);
        let file = root.join("present.db");
        std::fs::write(&file, b"").expect("write fixture");
        assert!(file_is_file(&file).expect("file check"));
        for missing in ["absent.db", "nowhere/absent.db"] {
            let err = file_is_file(&root.join(missing)).expect_err("missing path");
            assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        }
        std::fs::create_dir(root.join("dir")).expect("create dir");
        assert!(!file_is_file(&root.join("dir")).expect("dir check"));
    }

    #[rstest]
    fn relative_paths_resolve_from_the_current_directory() {
        let (_, relative) = base_dir_and_relative(Utf8Path::new("some/dir")).expect("split");
        assert_eq!(relative, Utf8PathBuf::from("some/dir"));
    }
}
