//! Input file list shared by every operation.
//!
//! [`FileList`] keeps PDF paths in insertion order, ignores duplicates and
//! anything that is not a `.pdf` file, and expands glob patterns and
//! directories.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PdfUtilError, Result};

/// Sort direction for [`FileList::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// A to Z.
    #[default]
    Ascending,
    /// Z to A.
    Descending,
}

/// Whether `path` has a `.pdf` extension, ignoring case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn has_glob_metacharacters(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Ordered, deduplicated list of PDF paths.
#[derive(Debug, Clone, Default)]
pub struct FileList {
    files: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl FileList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path. Returns `false` if it is not a PDF or already listed.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if !is_pdf(&path) || self.seen.contains(&path) {
            debug!(path = %path.display(), "skipping file");
            return false;
        }
        self.seen.insert(path.clone());
        self.files.push(path);
        true
    }

    /// Add every path yielded by `paths`. Returns how many were added.
    pub fn extend<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            if self.add(path) {
                added += 1;
            }
        }
        added
    }

    /// Add the files matching a glob pattern.
    ///
    /// A pattern without glob metacharacters is added as a literal path, so a
    /// missing file stays in the list and is reported when the operation runs.
    ///
    /// # Errors
    ///
    /// Returns [`PdfUtilError::InvalidConfig`] for malformed patterns and
    /// [`PdfUtilError::Other`] if a matched entry cannot be read.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<usize> {
        if !has_glob_metacharacters(pattern) {
            return Ok(usize::from(self.add(pattern)));
        }

        let entries = glob::glob(pattern).map_err(|err| {
            PdfUtilError::invalid_config(format!("Invalid pattern '{pattern}': {err}"))
        })?;

        let mut matched = Vec::new();
        for entry in entries {
            matched.push(entry.map_err(|err| PdfUtilError::other(err.to_string()))?);
        }
        Ok(self.extend(matched))
    }

    /// Add the PDFs inside `dir`, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfUtilError::FileNotFound`] if `dir` does not exist and
    /// [`PdfUtilError::Other`] if the directory cannot be read.
    pub fn add_dir(&mut self, dir: &Path, recursive: bool) -> Result<usize> {
        if !dir.is_dir() {
            return Err(PdfUtilError::file_not_found(dir));
        }

        let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut found = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|err| PdfUtilError::other(err.to_string()))?;
            if entry.file_type().is_file() {
                found.push(entry.into_path());
            }
        }
        found.sort();
        Ok(self.extend(found))
    }

    /// Remove a path. Returns whether it was listed.
    pub fn remove(&mut self, path: &Path) -> bool {
        if !self.seen.remove(path) {
            return false;
        }
        self.files.retain(|file| file != path);
        true
    }

    /// Remove every path.
    pub fn clear(&mut self) {
        self.files.clear();
        self.seen.clear();
    }

    /// Sort paths lexicographically.
    pub fn sort(&mut self, order: SortOrder) {
        self.files.sort();
        if order == SortOrder::Descending {
            self.files.reverse();
        }
    }

    /// Listed paths in order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.files
    }

    /// Number of listed paths.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Take the listed paths.
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.files
    }
}
