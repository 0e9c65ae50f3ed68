//! PDF document capability.
//!
//! The engine never touches a PDF library directly. It goes through a
//! [`PdfBackend`], which opens documents, copies pages between them, manages
//! password protection and writes them back out.
//!
//! Two backends ship with the crate:
//!
//! - [`LopdfBackend`]: reads and writes real PDF files with `lopdf`.
//! - [`MemoryBackend`]: keeps documents as page labels in memory, useful for
//!   tests and for embedders that want deterministic behaviour.

mod lopdf_backend;
mod memory;

pub use self::lopdf_backend::{LopdfBackend, LopdfDocument, WriteOptions};
pub use self::memory::{MemoryBackend, MemoryDocument};

use std::io;
use std::path::Path;

use crate::error::{PdfUtilError, Result};

/// Failure reported by a backend while reading or assembling a document.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The document is password protected and cannot be read as is.
    #[error("document is encrypted")]
    Encrypted,

    /// The document structure could not be read.
    #[error("{0}")]
    Malformed(String),
}

/// Trait abstracting the PDF operations the engine needs.
///
/// Page indices are 0-based. Implementations must be shareable across the
/// blocking tasks spawned by the [`TaskRunner`](crate::task::TaskRunner);
/// each task owns the documents it opens.
pub trait PdfBackend: Send + Sync + 'static {
    /// The in-memory document type.
    type Document: Send;

    /// Check that `path` names an existing regular file.
    ///
    /// # Errors
    ///
    /// [`PdfUtilError::FileNotFound`] if nothing exists at `path`,
    /// [`PdfUtilError::NotAFile`] if it is a directory.
    fn check_input(&self, path: &Path) -> Result<()> {
        match path.try_exists() {
            Ok(true) if path.is_dir() => Err(PdfUtilError::not_a_file(path)),
            Ok(true) => Ok(()),
            _ => Err(PdfUtilError::file_not_found(path)),
        }
    }

    /// Check whether an output target already exists.
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Open a document from disk.
    fn open(&self, path: &Path) -> std::result::Result<Self::Document, BackendError>;

    /// Create an empty document.
    fn create(&self) -> Self::Document;

    /// Number of pages in `doc`.
    fn page_count(&self, doc: &Self::Document) -> u32;

    /// Append page `index` of `src` to the end of `dest`.
    fn copy_page(
        &self,
        dest: &mut Self::Document,
        src: &Self::Document,
        index: u32,
    ) -> std::result::Result<(), BackendError>;

    /// Protect `doc` with `password` when it is written.
    fn set_password(&self, doc: &mut Self::Document, password: &str);

    /// Whether `doc` is still password protected.
    fn is_encrypted(&self, doc: &Self::Document) -> bool;

    /// Try to unlock `doc`. Returns `Ok(false)` if the password is rejected.
    ///
    /// An unlocked document whose page tree cannot be read is an error, so
    /// callers never write an empty copy over a protected file.
    fn decrypt_with(
        &self,
        doc: &mut Self::Document,
        password: &str,
    ) -> std::result::Result<bool, BackendError>;

    /// Write `doc` to `path`, replacing any existing file.
    fn write(&self, doc: &mut Self::Document, path: &Path) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_check_input() {
        let temp = TempDir::new().unwrap();
        let backend = MemoryBackend::new();

        let file = temp.path().join("a.pdf");
        std::fs::write(&file, b"%PDF-1.5").unwrap();

        assert!(LopdfBackend::new().check_input(&file).is_ok());
        assert!(matches!(
            LopdfBackend::new().check_input(temp.path()),
            Err(PdfUtilError::NotAFile { .. })
        ));
        assert!(matches!(
            LopdfBackend::new().check_input(&temp.path().join("missing.pdf")),
            Err(PdfUtilError::FileNotFound { .. })
        ));
        assert!(matches!(
            backend.check_input(&file),
            Err(PdfUtilError::FileNotFound { .. })
        ));
    }
}
