//! Error types for pdfutil.
//!
//! Every operation reports failures as a [`PdfUtilError`] value. Each error
//! renders as a single line carrying the operation and the path involved, so
//! a shell can show it verbatim next to the file it belongs to.
//!
//! # Error Categories
//!
//! - **Input Errors**: empty input list, missing files, invalid page selections
//! - **Document Errors**: unreadable PDFs, encryption state mismatches, wrong passwords
//! - **Output Errors**: write failures, refused overwrites
//! - **Configuration Errors**: invalid shell arguments

use std::io;
use std::path::PathBuf;

use crate::engine::OperationKind;
use crate::selection::SelectionError;

/// Result type alias for pdfutil operations.
pub type Result<T> = std::result::Result<T, PdfUtilError>;

/// Main error type for pdfutil operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfUtilError {
    /// No input files were given to an operation that needs at least one.
    #[error("Error {}: no input files", .operation.gerund())]
    EmptyInput {
        /// Operation that received no inputs.
        operation: OperationKind,
    },

    /// An input path does not exist.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// An input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// A page selection could not be parsed or does not fit the document.
    #[error("Invalid page selection '{selection}': {source}")]
    InvalidSelection {
        /// Selection text as given by the user.
        selection: String,
        /// What is wrong with it.
        #[source]
        source: SelectionError,
    },

    /// Decrypt was asked for a document that carries no encryption.
    #[error("PDF file is not encrypted: {}", .path.display())]
    NotEncrypted {
        /// Path to the plain document.
        path: PathBuf,
    },

    /// The supplied password does not open the document.
    #[error("Incorrect password for PDF: {}", .path.display())]
    WrongPassword {
        /// Path to the encrypted document.
        path: PathBuf,
    },

    /// Merge, split or encrypt was given an encrypted input.
    #[error("PDF is encrypted and must be decrypted first: {}", .path.display())]
    EncryptedPdf {
        /// Path to the encrypted document.
        path: PathBuf,
    },

    /// The PDF library could not read the document.
    #[error("Failed to open PDF {}: {reason}", .path.display())]
    Open {
        /// Path to the document.
        path: PathBuf,
        /// Reason reported by the PDF library.
        reason: String,
    },

    /// Reading or writing a file failed during an operation.
    #[error("Error {} PDF {}: {source}", .operation.gerund(), .path.display())]
    Io {
        /// Operation that was running.
        operation: OperationKind,
        /// File being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An output file exists and overwriting is disabled.
    #[error("Output file already exists: {}", .path.display())]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Invalid configuration or arguments.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

/// Coarse classification of [`PdfUtilError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No inputs supplied.
    EmptyInput,
    /// Input path missing or not a file.
    FileNotFound,
    /// Malformed or out-of-bounds page selection.
    InvalidSelection,
    /// Decrypt on a plain document.
    NotEncrypted,
    /// Password rejected.
    WrongPassword,
    /// Document unreadable or in the wrong encryption state.
    Open,
    /// Read or write failure.
    Io,
    /// Refused overwrite.
    OutputExists,
    /// Bad arguments.
    InvalidConfig,
    /// Anything else.
    Other,
}

impl PdfUtilError {
    /// Create an EmptyInput error.
    pub fn empty_input(operation: OperationKind) -> Self {
        Self::EmptyInput { operation }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    /// Create an InvalidSelection error.
    pub fn invalid_selection(selection: impl Into<String>, source: SelectionError) -> Self {
        Self::InvalidSelection {
            selection: selection.into(),
            source,
        }
    }

    /// Create a NotEncrypted error.
    pub fn not_encrypted(path: impl Into<PathBuf>) -> Self {
        Self::NotEncrypted { path: path.into() }
    }

    /// Create a WrongPassword error.
    pub fn wrong_password(path: impl Into<PathBuf>) -> Self {
        Self::WrongPassword { path: path.into() }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: impl Into<PathBuf>) -> Self {
        Self::EncryptedPdf { path: path.into() }
    }

    /// Create an Open error.
    pub fn open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Io error.
    pub fn io(operation: OperationKind, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput { .. } => ErrorKind::EmptyInput,
            Self::FileNotFound { .. } | Self::NotAFile { .. } => ErrorKind::FileNotFound,
            Self::InvalidSelection { .. } => ErrorKind::InvalidSelection,
            Self::NotEncrypted { .. } => ErrorKind::NotEncrypted,
            Self::WrongPassword { .. } => ErrorKind::WrongPassword,
            Self::Open { .. } | Self::EncryptedPdf { .. } => ErrorKind::Open,
            Self::Io { .. } => ErrorKind::Io,
            Self::OutputExists { .. } => ErrorKind::OutputExists,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Get the exit code for this error.
    ///
    /// Returns the appropriate process exit code based on error type.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidConfig | ErrorKind::InvalidSelection | ErrorKind::EmptyInput => 1,
            ErrorKind::FileNotFound => 2,
            ErrorKind::Open | ErrorKind::NotEncrypted | ErrorKind::WrongPassword => 3,
            ErrorKind::OutputExists => 4,
            ErrorKind::Io => 5,
            ErrorKind::Other => 1,
        }
    }
}
