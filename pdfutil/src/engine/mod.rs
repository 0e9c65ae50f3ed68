//! The page-operation engine.
//!
//! [`PdfEngine`] merges, splits, encrypts and decrypts documents through a
//! [`PdfBackend`]. Every operation checks its preconditions (inputs present,
//! selection valid, encryption state as expected) before the first output
//! file is written. Once writing has started there is no rollback: outputs
//! written before a failure stay on disk.
//!
//! # Examples
//!
//! ```no_run
//! use pdfutil::engine::PdfEngine;
//! use pdfutil::selection::PageSelection;
//! use std::path::{Path, PathBuf};
//!
//! let engine = PdfEngine::new();
//! let merged = engine.merge(
//!     &[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
//!     Path::new("merged.pdf"),
//! )?;
//! println!("wrote {} pages", merged.pages_written);
//!
//! engine.split(Path::new("merged.pdf"), Path::new("parts"), &PageSelection::Odd)?;
//! # Ok::<(), pdfutil::PdfUtilError>(())
//! ```

mod request;

pub use request::{
    OperationKind, OperationOutcome, OperationRequest, OperationResult, Password,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::{BackendError, LopdfBackend, PdfBackend};
use crate::config::{Config, OverwriteMode};
use crate::error::{PdfUtilError, Result};
use crate::selection::PageSelection;

/// Default output path of an encrypt: `{stem}_encrypted.pdf` next to `input`.
pub fn encrypted_output_path(input: &Path) -> PathBuf {
    input.with_file_name(format!("{}_encrypted.pdf", file_stem(input)))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Stateless façade over a [`PdfBackend`].
///
/// Cloning is cheap; clones share the backend.
#[derive(Debug)]
pub struct PdfEngine<B: PdfBackend = LopdfBackend> {
    backend: Arc<B>,
    overwrite_mode: OverwriteMode,
}

impl<B: PdfBackend> Clone for PdfEngine<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            overwrite_mode: self.overwrite_mode,
        }
    }
}

impl PdfEngine<LopdfBackend> {
    /// Create an engine writing real PDF files with default options.
    pub fn new() -> Self {
        Self::with_backend(LopdfBackend::new())
    }

    /// Create an engine honoring compression and overwrite settings.
    pub fn from_config(config: &Config) -> Self {
        Self::with_backend(LopdfBackend::from_config(config))
            .with_overwrite_mode(config.overwrite_mode)
    }
}

impl Default for PdfEngine<LopdfBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: PdfBackend> PdfEngine<B> {
    /// Create an engine over a custom backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            overwrite_mode: OverwriteMode::default(),
        }
    }

    /// Set what happens when an output file already exists.
    pub fn with_overwrite_mode(mut self, overwrite_mode: OverwriteMode) -> Self {
        self.overwrite_mode = overwrite_mode;
        self
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run a request.
    pub fn execute(&self, request: &OperationRequest) -> OperationResult {
        match request {
            OperationRequest::Merge { inputs, output } => self.merge(inputs, output),
            OperationRequest::Split {
                input,
                output_dir,
                selection,
            } => self.split(input, output_dir, selection),
            OperationRequest::Encrypt {
                input,
                password,
                output,
            } => self.encrypt(input, password, output.as_deref()),
            OperationRequest::Decrypt { input, password } => self.decrypt(input, password),
        }
    }

    /// Concatenate the pages of `inputs`, in order, into `output`.
    ///
    /// # Errors
    ///
    /// - [`PdfUtilError::EmptyInput`] if `inputs` is empty
    /// - [`PdfUtilError::FileNotFound`] if any input is missing
    /// - [`PdfUtilError::EncryptedPdf`] or [`PdfUtilError::Open`] if an input
    ///   cannot be read
    /// - [`PdfUtilError::OutputExists`] under [`OverwriteMode::NoClobber`]
    /// - [`PdfUtilError::Io`] if writing fails
    pub fn merge(&self, inputs: &[PathBuf], output: &Path) -> OperationResult {
        let kind = OperationKind::Merge;
        if inputs.is_empty() {
            return Err(PdfUtilError::empty_input(kind));
        }
        for input in inputs {
            self.backend.check_input(input)?;
        }
        self.check_output(output)?;

        info!(inputs = inputs.len(), output = %output.display(), "merging documents");

        let mut merged = self.backend.create();
        for input in inputs {
            let source = self.open_plain(input)?;
            let count = self.backend.page_count(&source);
            debug!(input = %input.display(), pages = count, "appending pages");
            self.copy_pages(&mut merged, &source, input, 0..count)?;
        }

        let pages_written = self.backend.page_count(&merged);
        self.write(kind, &mut merged, output)?;

        info!(pages = pages_written, output = %output.display(), "merge complete");
        Ok(OperationOutcome {
            kind,
            outputs: vec![output.to_path_buf()],
            pages_written,
        })
    }

    /// Write the pages picked by `selection` to documents in `output_dir`.
    ///
    /// Output names follow the input's stem: `{stem}_page{n}.pdf` for single
    /// pages and `{stem}_pages{start}-{end}.pdf` for custom ranges. The
    /// directory is created if needed.
    ///
    /// # Errors
    ///
    /// - [`PdfUtilError::FileNotFound`] if `input` is missing
    /// - [`PdfUtilError::InvalidSelection`] if a custom selection falls
    ///   outside the document
    /// - [`PdfUtilError::Io`] if writing a part fails; earlier parts remain
    pub fn split(
        &self,
        input: &Path,
        output_dir: &Path,
        selection: &PageSelection,
    ) -> OperationResult {
        let kind = OperationKind::Split;
        self.check_primary(kind, input)?;

        let source = self.open_plain(input)?;
        let page_count = self.backend.page_count(&source);
        let parts = selection
            .plan(page_count)
            .map_err(|e| PdfUtilError::invalid_selection(selection.to_string(), e))?;

        let stem = file_stem(input);
        let targets: Vec<PathBuf> = parts
            .iter()
            .map(|part| output_dir.join(part.file_name(&stem)))
            .collect();
        for target in &targets {
            self.check_output(target)?;
        }

        info!(
            input = %input.display(),
            selection = %selection,
            parts = parts.len(),
            "splitting document"
        );

        let mut pages_written = 0;
        for (part, target) in parts.iter().zip(&targets) {
            let mut doc = self.backend.create();
            self.copy_pages(&mut doc, &source, input, part.pages.iter().map(|page| page - 1))?;
            self.write(kind, &mut doc, target)?;
            pages_written += part.pages.len() as u32;
            debug!(output = %target.display(), pages = part.pages.len(), "wrote part");
        }

        Ok(OperationOutcome {
            kind,
            outputs: targets,
            pages_written,
        })
    }

    /// Write a password-protected copy of `input`.
    ///
    /// The copy goes to `output`, or to `{stem}_encrypted.pdf` in the input's
    /// directory. The same password is used as user and owner password.
    ///
    /// # Errors
    ///
    /// - [`PdfUtilError::FileNotFound`] if `input` is missing
    /// - [`PdfUtilError::EncryptedPdf`] if `input` is already protected
    /// - [`PdfUtilError::Io`] if writing fails
    pub fn encrypt(
        &self,
        input: &Path,
        password: &Password,
        output: Option<&Path>,
    ) -> OperationResult {
        let kind = OperationKind::Encrypt;
        self.check_primary(kind, input)?;

        let output = output.map_or_else(|| encrypted_output_path(input), Path::to_path_buf);
        self.check_output(&output)?;

        let source = self.open_plain(input)?;
        let count = self.backend.page_count(&source);

        info!(input = %input.display(), output = %output.display(), "encrypting document");

        let mut protected = self.backend.create();
        self.copy_pages(&mut protected, &source, input, 0..count)?;
        self.backend.set_password(&mut protected, password.expose());
        self.write(kind, &mut protected, &output)?;

        Ok(OperationOutcome {
            kind,
            outputs: vec![output],
            pages_written: count,
        })
    }

    /// Remove password protection from `input`, overwriting it in place.
    ///
    /// # Errors
    ///
    /// - [`PdfUtilError::FileNotFound`] if `input` is missing
    /// - [`PdfUtilError::NotEncrypted`] if `input` is not protected; nothing
    ///   is written in that case
    /// - [`PdfUtilError::WrongPassword`] if `password` does not open it
    /// - [`PdfUtilError::Io`] if writing fails
    pub fn decrypt(&self, input: &Path, password: &Password) -> OperationResult {
        let kind = OperationKind::Decrypt;
        self.check_primary(kind, input)?;

        let mut source = match self.backend.open(input) {
            Ok(doc) => doc,
            Err(BackendError::Encrypted) => return Err(PdfUtilError::wrong_password(input)),
            Err(BackendError::Malformed(reason)) => {
                return Err(PdfUtilError::open(input, reason));
            }
        };
        if !self.backend.is_encrypted(&source) {
            return Err(PdfUtilError::not_encrypted(input));
        }
        match self.backend.decrypt_with(&mut source, password.expose()) {
            Ok(true) => {}
            Ok(false) => {
                warn!(input = %input.display(), "password rejected");
                return Err(PdfUtilError::wrong_password(input));
            }
            Err(e) => return Err(backend_error(input, e)),
        }

        info!(input = %input.display(), "decrypting document in place");

        let count = self.backend.page_count(&source);
        let mut plain = self.backend.create();
        self.copy_pages(&mut plain, &source, input, 0..count)?;
        self.write(kind, &mut plain, input)?;

        Ok(OperationOutcome {
            kind,
            outputs: vec![input.to_path_buf()],
            pages_written: count,
        })
    }

    fn check_primary(&self, kind: OperationKind, input: &Path) -> Result<()> {
        if input.as_os_str().is_empty() {
            return Err(PdfUtilError::empty_input(kind));
        }
        self.backend.check_input(input)
    }

    fn check_output(&self, output: &Path) -> Result<()> {
        if self.overwrite_mode == OverwriteMode::NoClobber && self.backend.exists(output) {
            return Err(PdfUtilError::output_exists(output));
        }
        Ok(())
    }

    /// Open a document that must not be password protected.
    fn open_plain(&self, path: &Path) -> Result<B::Document> {
        let doc = self
            .backend
            .open(path)
            .map_err(|e| backend_error(path, e))?;
        if self.backend.is_encrypted(&doc) {
            return Err(PdfUtilError::encrypted_pdf(path));
        }
        Ok(doc)
    }

    fn copy_pages(
        &self,
        dest: &mut B::Document,
        source: &B::Document,
        path: &Path,
        indices: impl IntoIterator<Item = u32>,
    ) -> Result<()> {
        indices.into_iter().try_for_each(|index| {
            self.backend
                .copy_page(dest, source, index)
                .map_err(|e| backend_error(path, e))
        })
    }

    fn write(&self, kind: OperationKind, doc: &mut B::Document, path: &Path) -> Result<()> {
        self.backend
            .write(doc, path)
            .map_err(|e| PdfUtilError::io(kind, path, e))
    }
}

fn backend_error(path: &Path, err: BackendError) -> PdfUtilError {
    match err {
        BackendError::Encrypted => PdfUtilError::encrypted_pdf(path),
        BackendError::Malformed(reason) => PdfUtilError::open(path, reason),
    }
}
