//! Operation requests and outcomes.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PdfUtilError;
use crate::selection::PageSelection;

/// The four document operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Concatenate documents.
    Merge,
    /// Write selected pages to separate documents.
    Split,
    /// Password-protect a document.
    Encrypt,
    /// Remove password protection in place.
    Decrypt,
}

impl OperationKind {
    /// Present participle used in error messages ("merging", "splitting", ...).
    pub fn gerund(&self) -> &'static str {
        match self {
            Self::Merge => "merging",
            Self::Split => "splitting",
            Self::Encrypt => "encrypting",
            Self::Decrypt => "decrypting",
        }
    }

    /// Past participle shown once an operation succeeded on a file.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Merge => "Merged",
            Self::Split => "Split",
            Self::Encrypt => "Encrypted",
            Self::Decrypt => "Decrypted",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Merge => "merge",
            Self::Split => "split",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        })
    }
}

/// A document password. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wrap a password.
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// The password text.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the password is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self::new(password)
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self(password)
    }
}

/// One unit of work for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    /// Concatenate `inputs` into `output`.
    Merge {
        /// Documents in output order.
        inputs: Vec<PathBuf>,
        /// Merged document path.
        output: PathBuf,
    },
    /// Split `input` into documents under `output_dir`.
    Split {
        /// Document to split.
        input: PathBuf,
        /// Directory receiving the parts.
        output_dir: PathBuf,
        /// Which pages go where.
        selection: PageSelection,
    },
    /// Write a protected copy of `input`.
    Encrypt {
        /// Document to protect.
        input: PathBuf,
        /// Password for the copy.
        password: Password,
        /// Target path, `{stem}_encrypted.pdf` next to the input if absent.
        output: Option<PathBuf>,
    },
    /// Replace `input` with an unprotected copy.
    Decrypt {
        /// Protected document.
        input: PathBuf,
        /// Password that opens it.
        password: Password,
    },
}

impl OperationRequest {
    /// Kind of operation requested.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Merge { .. } => OperationKind::Merge,
            Self::Split { .. } => OperationKind::Split,
            Self::Encrypt { .. } => OperationKind::Encrypt,
            Self::Decrypt { .. } => OperationKind::Decrypt,
        }
    }

    /// The file a per-file task is about. For merges, the first input.
    pub fn primary_input(&self) -> Option<&Path> {
        match self {
            Self::Merge { inputs, .. } => inputs.first().map(PathBuf::as_path),
            Self::Split { input, .. }
            | Self::Encrypt { input, .. }
            | Self::Decrypt { input, .. } => Some(input),
        }
    }
}

/// What a successful operation produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    /// Operation that ran.
    pub kind: OperationKind,
    /// Files written, in write order.
    pub outputs: Vec<PathBuf>,
    /// Pages written across all outputs.
    pub pages_written: u32,
}

/// Result of one operation.
pub type OperationResult = Result<OperationOutcome, PdfUtilError>;
