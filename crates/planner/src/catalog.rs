//! Image discovery.
//!
//! The catalog is the deterministic, duplicate-free list of still images a
//! slideshow can draw from. Only the top level of the directory is scanned and
//! hidden files are ignored, so re-scanning an unchanged directory always
//! yields the same list in the same order.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use slidecast_common::error::{SlidecastError, SlidecastResult};
use walkdir::{DirEntry, WalkDir};

/// A still image on disk. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ImagePath(PathBuf);

impl ImagePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.display().to_string())
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for ImagePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for ImagePath {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

/// Return `true` if `path` carries one of `extensions` (no dot, exact case).
#[must_use]
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Discover images directly inside `directory`.
///
/// Files from every extension are unioned and sorted by path, so ordering is
/// alphabetical across the union rather than grouped by extension.
///
/// # Errors
/// Returns [`SlidecastError::DirectoryNotFound`] if `directory` is not a
/// directory or cannot be listed. Individual entries that cannot be read
/// (dangling symlinks, permission errors) are logged and skipped.
pub fn discover_images(directory: &Path, extensions: &[String]) -> SlidecastResult<Vec<ImagePath>> {
    if !directory.is_dir() {
        return Err(SlidecastError::directory_not_found(directory));
    }

    let mut found = BTreeSet::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                tracing::warn!(directory = %directory.display(), error = %e, "cannot read image directory");
                return Err(SlidecastError::directory_not_found(directory));
            }
            Err(e) => {
                // Dangling symlinks and unreadable entries are skipped, not fatal.
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if is_hidden(&entry) || !entry.file_type().is_file() {
            continue;
        }
        if has_extension(entry.path(), extensions) {
            found.insert(ImagePath::new(entry.into_path()));
        }
    }

    tracing::debug!(
        directory = %directory.display(),
        count = found.len(),
        "image discovery complete"
    );
    Ok(found.into_iter().collect())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|n| n.starts_with('.'))
}
