//! Configuration for pdfutil operations.
//!
//! The shell turns its arguments into a [`Config`], validates it once and
//! hands it to the engine. The engine reads only the output-related settings;
//! verbosity flags drive the [`OutputFormatter`](crate::output::OutputFormatter).

use std::str::FromStr;

use crate::error::{PdfUtilError, Result};

/// Compression level for written PDFs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as they were read.
    None,
    /// Compress streams with Flate.
    #[default]
    Standard,
    /// Compress streams and drop unreferenced objects before writing.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfUtilError;

    /// Parse compression level from "none", "standard" or "maximum",
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfUtilError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// What to do when an output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Replace existing files.
    #[default]
    Force,
    /// Fail with [`PdfUtilError::OutputExists`] before writing anything.
    NoClobber,
}

/// Validated settings shared by the engine and the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Compression applied when writing documents.
    pub compression: CompressionLevel,
    /// Behaviour for existing output files.
    pub overwrite_mode: OverwriteMode,
    /// Print extra detail.
    pub verbose: bool,
    /// Print only errors.
    pub quiet: bool,
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if verbose and quiet modes are both enabled.
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(PdfUtilError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }
        Ok(())
    }

    /// Check if progress output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_from_str() {
        assert_eq!(
            CompressionLevel::from_str("none").unwrap(),
            CompressionLevel::None
        );
        assert_eq!(
            CompressionLevel::from_str("Standard").unwrap(),
            CompressionLevel::Standard
        );
        assert_eq!(
            CompressionLevel::from_str("MAXIMUM").unwrap(),
            CompressionLevel::Maximum
        );
        assert!(CompressionLevel::from_str("best").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.compression, CompressionLevel::Standard);
        assert_eq!(config.overwrite_mode, OverwriteMode::Force);
        assert!(config.validate().is_ok());
        assert!(config.should_print());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let config = Config {
            verbose: true,
            quiet: true,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("--verbose"));
    }
}
