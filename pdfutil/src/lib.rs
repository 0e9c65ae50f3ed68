//! pdfutil - Merge, split, encrypt and decrypt PDF files.
//!
//! The library is organised around a page-operation engine:
//!
//! - [`selection`] parses page selections such as `"2-5, 9, 12-16"` and
//!   plans split outputs
//! - [`engine`] runs merge, split, encrypt and decrypt over a [`backend`]
//! - [`task`] runs one encrypt or decrypt per file as independent tasks
//! - [`files`] collects input paths from files, globs and directories
//!
//! # Examples
//!
//! ## Merge and split
//!
//! ```no_run
//! use pdfutil::engine::PdfEngine;
//! use pdfutil::selection::PageSelection;
//! use std::path::{Path, PathBuf};
//!
//! let engine = PdfEngine::new();
//! engine.merge(
//!     &[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
//!     Path::new("merged.pdf"),
//! )?;
//!
//! let selection = PageSelection::custom("1-3, 7")?;
//! engine.split(Path::new("merged.pdf"), Path::new("parts"), &selection)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Encrypt many files
//!
//! ```no_run
//! use pdfutil::engine::{OperationRequest, PdfEngine};
//! use pdfutil::task::TaskRunner;
//!
//! # async fn example() {
//! let mut runner = TaskRunner::new(PdfEngine::new());
//! for input in ["a.pdf", "b.pdf"] {
//!     runner.submit(OperationRequest::Encrypt {
//!         input: input.into(),
//!         password: "secret".into(),
//!         output: None,
//!     });
//! }
//! let summary = runner.join_all(|_| {}).await;
//! assert_eq!(summary.total, 2);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod files;
pub mod output;
pub mod selection;
pub mod task;

// Re-export commonly used types
pub use config::Config;
pub use engine::{OperationKind, OperationRequest, PdfEngine};
pub use error::{ErrorKind, PdfUtilError, Result};
pub use selection::PageSelection;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
