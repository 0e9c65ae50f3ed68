//! In-memory [`PdfBackend`].
//!
//! Documents are lists of page labels stored in a map keyed by path. Clones
//! of a [`MemoryBackend`] share the same store, so a test can hand one clone
//! to the engine and inspect the results through another.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{BackendError, PdfBackend};
use crate::error::{PdfUtilError, Result};

#[derive(Debug, Clone)]
enum StoredFile {
    Pdf {
        pages: Vec<String>,
        password: Option<String>,
    },
    Corrupt,
}

#[derive(Debug, Default)]
struct Store {
    files: HashMap<PathBuf, StoredFile>,
    failing: HashSet<PathBuf>,
    writes: usize,
}

/// Document held by a [`MemoryBackend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    pages: Vec<String>,
    password: Option<String>,
    locked: bool,
}

impl MemoryDocument {
    /// Page labels in order.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }
}

/// Backend keeping documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    store: Arc<Mutex<Store>>,
}

impl MemoryBackend {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a plain document with the given page labels.
    pub fn insert<I, S>(&self, path: impl Into<PathBuf>, pages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store().files.insert(
            path.into(),
            StoredFile::Pdf {
                pages: pages.into_iter().map(Into::into).collect(),
                password: None,
            },
        );
    }

    /// Add a password-protected document.
    pub fn insert_encrypted<I, S>(&self, path: impl Into<PathBuf>, pages: I, password: &str)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store().files.insert(
            path.into(),
            StoredFile::Pdf {
                pages: pages.into_iter().map(Into::into).collect(),
                password: Some(password.to_string()),
            },
        );
    }

    /// Add a file that exists but cannot be parsed.
    pub fn insert_corrupt(&self, path: impl Into<PathBuf>) {
        self.store().files.insert(path.into(), StoredFile::Corrupt);
    }

    /// Make every later write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.store().failing.insert(path.into());
    }

    /// Page labels of the document stored at `path`.
    pub fn pages(&self, path: &Path) -> Option<Vec<String>> {
        match self.store().files.get(path) {
            Some(StoredFile::Pdf { pages, .. }) => Some(pages.clone()),
            _ => None,
        }
    }

    /// Whether the document stored at `path` is password protected.
    pub fn is_protected(&self, path: &Path) -> Option<bool> {
        match self.store().files.get(path) {
            Some(StoredFile::Pdf { password, .. }) => Some(password.is_some()),
            _ => None,
        }
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.store().files.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.store().writes
    }
}

impl PdfBackend for MemoryBackend {
    type Document = MemoryDocument;

    fn check_input(&self, path: &Path) -> Result<()> {
        if self.store().files.contains_key(path) {
            Ok(())
        } else {
            Err(PdfUtilError::file_not_found(path))
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.store().files.contains_key(path)
    }

    fn open(&self, path: &Path) -> std::result::Result<Self::Document, BackendError> {
        match self.store().files.get(path) {
            Some(StoredFile::Pdf { pages, password }) => Ok(MemoryDocument {
                pages: pages.clone(),
                password: password.clone(),
                locked: password.is_some(),
            }),
            Some(StoredFile::Corrupt) => {
                Err(BackendError::Malformed("invalid file header".to_string()))
            }
            None => Err(BackendError::Malformed(format!(
                "no document at {}",
                path.display()
            ))),
        }
    }

    fn create(&self) -> Self::Document {
        MemoryDocument::default()
    }

    fn page_count(&self, doc: &Self::Document) -> u32 {
        doc.pages.len() as u32
    }

    fn copy_page(
        &self,
        dest: &mut Self::Document,
        src: &Self::Document,
        index: u32,
    ) -> std::result::Result<(), BackendError> {
        if src.locked {
            return Err(BackendError::Encrypted);
        }
        let page = src.pages.get(index as usize).ok_or_else(|| {
            BackendError::Malformed(format!("page {} does not exist", index + 1))
        })?;
        dest.pages.push(page.clone());
        Ok(())
    }

    fn set_password(&self, doc: &mut Self::Document, password: &str) {
        doc.password = Some(password.to_string());
    }

    fn is_encrypted(&self, doc: &Self::Document) -> bool {
        doc.locked
    }

    fn decrypt_with(
        &self,
        doc: &mut Self::Document,
        password: &str,
    ) -> std::result::Result<bool, BackendError> {
        if doc.password.as_deref() != Some(password) {
            return Ok(false);
        }
        if doc.pages.is_empty() {
            return Err(BackendError::Malformed("no pages after decryption".to_string()));
        }
        doc.locked = false;
        doc.password = None;
        Ok(true)
    }

    fn write(&self, doc: &mut Self::Document, path: &Path) -> io::Result<()> {
        let mut store = self.store();
        if store.failing.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        store.files.insert(
            path.to_path_buf(),
            StoredFile::Pdf {
                pages: doc.pages.clone(),
                password: doc.password.clone(),
            },
        );
        store.writes += 1;
        Ok(())
    }
}
