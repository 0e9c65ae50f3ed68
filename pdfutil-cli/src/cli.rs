//! CLI argument parsing for pdfutil.
//!
//! Defines the command-line interface using `clap`: one subcommand per
//! document operation plus global output and overwrite flags.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pdfutil::config::{CompressionLevel, Config, OverwriteMode};
use pdfutil::engine::Password;
use pdfutil::error::{PdfUtilError, Result};
use pdfutil::files::{FileList, SortOrder, is_pdf};
use pdfutil::selection::PageSelection;

/// Merge, split, encrypt and decrypt PDF files.
#[derive(Parser, Debug)]
#[command(name = "pdfutil")]
#[command(version)]
#[command(about = "Merge, split, encrypt and decrypt PDF files", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output - show details and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Compression level for written PDFs
    ///
    /// - none: No compression
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and drop unused objects
    #[arg(short, long, global = true, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Never overwrite existing output files
    ///
    /// Fail before writing if an output file already exists.
    /// Decrypt always replaces its input.
    #[arg(long, global = true)]
    pub no_clobber: bool,

    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

/// Document operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Concatenate PDFs into a single document
    ///
    /// Examples:
    ///   pdfutil merge a.pdf b.pdf -o merged.pdf
    ///   pdfutil merge 'chapters/*.pdf' --sort asc -o book.pdf
    Merge(MergeArgs),

    /// Write pages of a PDF to separate documents
    ///
    /// Examples:
    ///   pdfutil split report.pdf -d pages
    ///   pdfutil split report.pdf -d parts --pages "1-3, 7"
    Split(SplitArgs),

    /// Password-protect PDFs
    ///
    /// Each input is written to <name>_encrypted.pdf next to it.
    Encrypt(EncryptArgs),

    /// Remove password protection from PDFs in place
    Decrypt(DecryptArgs),
}

/// Sort order for input lists.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    /// A to Z
    Asc,
    /// Z to A
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Asc => SortOrder::Ascending,
            SortArg::Desc => SortOrder::Descending,
        }
    }
}

/// How a split groups pages into files.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// One file per page
    All,
    /// Pages 1, 3, 5, ...
    Odd,
    /// Pages 2, 4, 6, ...
    Even,
    /// Pages listed with --pages
    Custom,
}

/// Arguments of `pdfutil merge`.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input PDFs, glob patterns or directories (in order)
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// ".pdf" is appended if the name has no PDF extension.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Sort inputs by path before merging
    #[arg(short, long, value_enum, value_name = "ORDER")]
    pub sort: Option<SortArg>,

    /// Descend into subdirectories of directory inputs
    #[arg(short, long)]
    pub recursive: bool,
}

impl MergeArgs {
    /// Output path with a `.pdf` extension.
    pub fn output_path(&self) -> PathBuf {
        with_pdf_extension(&self.output)
    }
}

/// Arguments of `pdfutil split`.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// PDF to split
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Directory receiving the parts
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Which pages to write
    #[arg(short, long, value_enum)]
    pub mode: Option<SplitMode>,

    /// Custom page selection, e.g. "2-5, 9, 12-16"
    ///
    /// Each comma-separated item becomes one output file.
    /// Implies --mode custom.
    #[arg(short, long, value_name = "PAGES")]
    pub pages: Option<String>,
}

impl SplitArgs {
    /// Page selection requested by the arguments.
    ///
    /// Custom selections are checked for syntax here; bounds are checked
    /// against the document when the split runs.
    pub fn selection(&self) -> Result<PageSelection> {
        let mode = match (self.mode, &self.pages) {
            (Some(mode), _) => mode,
            (None, Some(_)) => SplitMode::Custom,
            (None, None) => SplitMode::All,
        };

        match mode {
            SplitMode::Custom => {
                let pages = self
                    .pages
                    .as_deref()
                    .filter(|pages| !pages.trim().is_empty())
                    .ok_or_else(|| PdfUtilError::invalid_config("Enter custom pages"))?;
                PageSelection::custom(pages)
                    .map_err(|err| PdfUtilError::invalid_selection(pages, err))
            }
            _ if self.pages.is_some() => Err(PdfUtilError::invalid_config(
                "--pages can only be used with --mode custom",
            )),
            SplitMode::All => Ok(PageSelection::All),
            SplitMode::Odd => Ok(PageSelection::Odd),
            SplitMode::Even => Ok(PageSelection::Even),
        }
    }
}

/// Arguments of `pdfutil encrypt`.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Input PDFs, glob patterns or directories
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Password for the protected copies
    #[arg(short, long, env = "PDFUTIL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output path (single input only)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl EncryptArgs {
    /// Expand the input patterns.
    ///
    /// `--output` names one file, so it is rejected once the patterns expand
    /// to more than one input.
    pub fn expand_inputs(&self) -> Result<Vec<PathBuf>> {
        let inputs = collect_inputs(&self.inputs, false, None)?;
        check_single_output(self.output.as_deref(), inputs.len())?;
        Ok(inputs)
    }
}

fn check_single_output(output: Option<&Path>, inputs: usize) -> Result<()> {
    if output.is_some() && inputs != 1 {
        return Err(PdfUtilError::invalid_config(
            "--output can only be used with a single input",
        ));
    }
    Ok(())
}

/// Arguments of `pdfutil decrypt`.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Protected PDFs, glob patterns or directories
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Password that opens the inputs
    #[arg(short, long, env = "PDFUTIL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Reject missing or empty passwords.
pub fn require_password(password: Option<&str>) -> Result<Password> {
    match password {
        Some(password) if !password.is_empty() => Ok(Password::new(password)),
        _ => Err(PdfUtilError::invalid_config("Enter password")),
    }
}

/// Append `.pdf` unless `path` already has a PDF extension.
pub fn with_pdf_extension(path: &Path) -> PathBuf {
    if is_pdf(path) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".pdf");
    PathBuf::from(name)
}

/// Expand files, glob patterns and directories into a PDF list.
pub fn collect_inputs(
    patterns: &[String],
    recursive: bool,
    sort: Option<SortOrder>,
) -> Result<Vec<PathBuf>> {
    let mut files = FileList::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_dir() {
            files.add_dir(path, recursive)?;
        } else {
            files.add_pattern(pattern)?;
        }
    }
    if let Some(order) = sort {
        files.sort(order);
    }
    Ok(files.into_paths())
}

impl Cli {
    /// Convert CLI arguments to a validated configuration.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;
        let overwrite_mode = if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Force
        };

        let config = Config {
            compression,
            overwrite_mode,
            verbose: self.verbose,
            quiet: self.quiet,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check argument combinations clap cannot express.
    pub fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Encrypt(args) => {
                require_password(args.password.as_deref())?;
                check_single_output(args.output.as_deref(), args.inputs.len())?;
            }
            Command::Decrypt(args) => {
                require_password(args.password.as_deref())?;
            }
            Command::Split(args) => {
                args.selection()?;
            }
            Command::Merge(_) => {}
        }
        Ok(())
    }
}
