use crate::error::Result;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const INIT_PY: &str = "__init__.py";

/// Atomically write `data` to `path` using a tempfile in the same directory.
///
/// The parent directory must already exist.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Create an empty file if nothing exists at `path`. Never truncates.
pub fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
///
/// Uses `create_new`, so a file that appears between check and write is
/// left alone as well.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    let mut f = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    f.write_all(data)?;
    Ok(true)
}

/// Create `dir` (and parents) and make it an importable Python package by
/// touching `__init__.py` inside it.
pub fn ensure_package_dir(dir: &Path) -> Result<()> {
    ensure_dir(dir)?;
    touch(&dir.join(INIT_PY))
}
