//! Flat-file identifier sets (`patches.txt`, `modules.txt`).
//!
//! An index file holds one identifier per line. Registration is idempotent:
//! lines are trimmed, blanks dropped and duplicates collapsed on every write,
//! and the file always ends with exactly one newline. First-occurrence order
//! is kept, so entries that were already present stay where they were.

use crate::error::Result;
use crate::io;
use std::collections::HashSet;
use std::path::Path;

/// Trim every line, drop blanks and collapse duplicates.
pub fn normalize<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if seen.insert(line.to_string()) {
            out.push(line.to_string());
        }
    }
    out
}

/// Read the normalized identifiers of an index file. A missing file is empty.
pub fn read(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(normalize(content.lines()))
}

fn render(entries: &[String]) -> String {
    let mut out = entries.join("\n");
    out.push('\n');
    out
}

/// Add `identifier` to the index file at `path`.
///
/// The file is created empty if absent; its parent directory must exist.
/// The rewrite is atomic, but there is no locking: concurrent writers on the
/// same file race and the last one wins.
pub fn register(path: &Path, identifier: &str) -> Result<Vec<String>> {
    io::touch(path)?;
    let content = std::fs::read_to_string(path)?;
    let entries = normalize(content.lines().chain(std::iter::once(identifier)));
    io::atomic_write(path, render(&entries).as_bytes())?;
    tracing::debug!(path = %path.display(), identifier, entries = entries.len(), "index updated");
    Ok(entries)
}
