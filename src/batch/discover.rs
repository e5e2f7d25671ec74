use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::format::SUPPORTED_EXTENSIONS, foundation::error::PadmarkResult,
    pipeline::file::is_processed_name,
};

/// Classification of the entries directly inside an input directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Supported images to dispatch, sorted by path.
    pub candidates: Vec<PathBuf>,
    /// Supported images that already carry the suffix marker, sorted by path.
    pub already_processed: Vec<PathBuf>,
    /// Entries that are not supported image files (other extensions, directories).
    pub ignored: usize,
}

impl Discovery {
    /// Number of entries looked at.
    pub fn total(&self) -> usize {
        self.candidates.len() + self.already_processed.len() + self.ignored
    }
}

/// Whether `path` has one of the supported image extensions (case-insensitive).
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// List `dir` non-recursively and split its entries for dispatch.
pub fn discover(dir: &Path) -> PadmarkResult<Discovery> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("list directory '{}'", dir.display()))?;

    let mut out = Discovery::default();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() || !has_supported_extension(&path) {
            out.ignored += 1;
            continue;
        }
        let name = entry.file_name();
        if is_processed_name(&name.to_string_lossy()) {
            out.already_processed.push(path);
        } else {
            out.candidates.push(path);
        }
    }
    out.candidates.sort();
    out.already_processed.sort();
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/batch/discover.rs"]
mod tests;
