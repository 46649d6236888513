//! File system utilities for tscdoc.
//!
//! Every write goes through a [`TempFile`] created next to its target and
//! renamed over it, so a failed run never leaves a half-written document.

pub mod path;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tscdoc_common_core::{Error, ErrorCode, Result};

/// Largest source or TOC file we are willing to load.
pub const MAX_TEXT_FILE_SIZE: usize = 8 * 1024 * 1024;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn io_error(code: ErrorCode, message: String, path: &Path, e: io::Error) -> Error {
    Error::file_system(code, message, path, Some(Box::new(e)))
}

fn read_error(path: &Path, e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::NotFound => Error::file_not_found(path),
        io::ErrorKind::PermissionDenied => io_error(
            ErrorCode::FILE_READ_ERROR,
            format!("permission denied: {}", path.display()),
            path,
            e,
        ),
        _ => io_error(
            ErrorCode::FILE_READ_ERROR,
            format!("failed to read file: {}", path.display()),
            path,
            e,
        ),
    }
}

/// Read a UTF-8 text file with a size limit, dropping a leading BOM.
pub fn read_to_string(path: impl AsRef<Path>, max_size: usize) -> Result<String> {
    let path = path.as_ref();

    let metadata = fs::metadata(path).map_err(|e| read_error(path, e))?;
    if metadata.len() > max_size as u64 {
        return Err(Error::file_system(
            ErrorCode::FILE_READ_ERROR,
            format!(
                "file too large: {} bytes (max: {})",
                metadata.len(),
                max_size
            ),
            path,
            None,
        ));
    }

    let bytes = fs::read(path).map_err(|e| read_error(path, e))?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);

    String::from_utf8(body.to_vec()).map_err(|e| {
        Error::file_system(
            ErrorCode::FILE_READ_ERROR,
            format!("file is not valid UTF-8: {}", path.display()),
            path,
            Some(Box::new(e)),
        )
    })
}

/// Ensure a directory exists.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| {
            io_error(
                ErrorCode::DIRECTORY_ERROR,
                format!("failed to create directory: {}", path.display()),
                path,
                e,
            )
        })?;
    }
    Ok(())
}

/// A scoped temporary file, removed on drop unless persisted.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    file: Option<File>,
}

impl TempFile {
    /// Create a temporary file in the directory of `target`, named after
    /// it, so that [`persist`](Self::persist) is a same-directory rename.
    pub fn next_to(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref();
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tscdoc".to_string());
        Self::create(dir, &format!(".{name}"))
    }

    fn create(dir: &Path, stem: &str) -> Result<Self> {
        ensure_dir(dir)?;

        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!("{stem}.{}-{n}.tmp", std::process::id()));

        let file = File::create(&path).map_err(|e| {
            io_error(
                ErrorCode::FILE_WRITE_ERROR,
                format!("failed to create temporary file: {}", path.display()),
                &path,
                e,
            )
        })?;

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    /// Get the path of the temporary file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write data to the temporary file.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Err(Error::internal(format!(
                "temporary file has been consumed: {}",
                self.path.display()
            )));
        };
        file.write_all(data).map_err(|e| {
            io_error(
                ErrorCode::FILE_WRITE_ERROR,
                format!("failed to write to temporary file: {}", self.path.display()),
                &self.path,
                e,
            )
        })
    }

    /// Flush and rename the temporary file onto `target`.
    pub fn persist(mut self, target: impl AsRef<Path>) -> Result<()> {
        let target = target.as_ref();
        if let Some(file) = self.file.take() {
            file.sync_all().map_err(|e| {
                io_error(
                    ErrorCode::FILE_WRITE_ERROR,
                    format!("failed to sync temporary file: {}", self.path.display()),
                    &self.path,
                    e,
                )
            })?;
        }

        // On failure `self` drops here and the temp file is removed.
        fs::rename(&self.path, target).map_err(|e| {
            io_error(
                ErrorCode::FILE_WRITE_ERROR,
                format!("failed to replace {}", target.display()),
                target,
                e,
            )
        })?;

        std::mem::forget(self);
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        drop(self.file.take());
        let _ = fs::remove_file(&self.path);
    }
}

/// Delete a file if it exists. Returns whether a file was removed.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(
            ErrorCode::FILE_DELETE_ERROR,
            format!("failed to remove file: {}", path.display()),
            path,
            e,
        )),
    }
}

/// List regular files directly inside a directory, sorted by path.
pub fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let dir_error = |e: io::Error| {
        io_error(
            ErrorCode::DIRECTORY_ERROR,
            format!("failed to read directory: {}", dir.display()),
            dir,
            e,
        )
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn replace(target: &Path, contents: &str) -> Result<()> {
        let mut temp = TempFile::next_to(target)?;
        temp.write(contents.as_bytes())?;
        temp.persist(target)
    }

    #[test]
    fn test_persist_replaces_content() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Bogus_oAW_Generator_Tests.rst");

        replace(&file, "first").unwrap();
        replace(&file, "second").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "second");
        // Only the target remains; no temp siblings.
        assert_eq!(list_files(dir.path()).unwrap(), vec![file]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_to_string(dir.path().join("missing.tsc"), 1024).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FILE_NOT_FOUND);
    }

    #[test]
    fn test_read_with_size_limit() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("big.tsc");
        fs::write(&file, "x".repeat(64)).unwrap();

        assert!(read_to_string(&file, 64).is_ok());
        let err = read_to_string(&file, 63).unwrap_err();
        assert!(err.to_string().contains("file too large"));
    }

    #[test]
    fn test_read_strips_bom() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("bom.tsc");
        fs::write(&file, b"\xEF\xBB\xBF// Description\n").unwrap();

        assert_eq!(read_to_string(&file, 1024).unwrap(), "// Description\n");
    }

    #[test]
    fn test_read_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("latin1.tsc");
        fs::write(&file, [0x2F, 0x2F, 0x20, 0xE9]).unwrap();

        let err = read_to_string(&file, 1024).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FILE_READ_ERROR);
    }

    #[test]
    fn test_temp_file_removed_on_drop() {
        let dir = tempdir().unwrap();
        let path = {
            let mut temp = TempFile::next_to(dir.path().join("a.rst")).unwrap();
            temp.write(b"scratch").unwrap();
            temp.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_file_persist() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("toc.rst");
        let mut temp = TempFile::next_to(&target).unwrap();
        let temp_path = temp.path().to_path_buf();
        assert_eq!(temp_path.parent(), Some(dir.path()));
        assert!(temp_path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(".toc.rst.") && n.ends_with(".tmp")));
        temp.write(b"toc").unwrap();
        temp.persist(&target).unwrap();

        assert!(!temp_path.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "toc");
    }

    #[test]
    fn test_remove_file_if_exists() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("stale.rst");
        fs::write(&file, "old").unwrap();

        assert!(remove_file_if_exists(&file).unwrap());
        assert!(!remove_file_if_exists(&file).unwrap());
    }

    #[test]
    fn test_list_files_skips_dirs_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.rst"), "").unwrap();
        fs::write(dir.path().join("a.rst"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let names: Vec<_> = list_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.rst", "b.rst"]);
    }
}
