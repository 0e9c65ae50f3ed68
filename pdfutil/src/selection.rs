//! Page selection parsing and split planning.
//!
//! A selection string such as `"2-5, 9, 12-16"` names pages by their 1-based
//! numbers. Parsing happens in two phases so a shell can reject bad syntax
//! before any document is opened:
//!
//! 1. [`parse_ranges`] checks syntax and range ordering.
//! 2. [`validate_ranges`] checks every endpoint against a page count.
//!
//! [`parse`] runs both and expands the result into page numbers, keeping the
//! user's order. Nothing is sorted, merged or deduplicated.
//!
//! # Examples
//!
//! ```
//! use pdfutil::selection;
//!
//! let pages = selection::parse("2-5,9,12-16", 20).unwrap();
//! assert_eq!(pages, vec![2, 3, 4, 5, 9, 12, 13, 14, 15, 16]);
//! ```

use std::fmt;

/// Why a selection was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The selection contains no tokens.
    #[error("selection is empty")]
    EmptySelection,

    /// A token is not a positive integer or a `start-end` pair of them.
    #[error("'{token}' is not a page number")]
    InvalidNumber {
        /// Offending token, trimmed.
        token: String,
    },

    /// A range whose start lies after its end.
    #[error("range {start}-{end} starts after it ends")]
    InvalidRange {
        /// First page of the range.
        start: u32,
        /// Last page of the range.
        end: u32,
    },

    /// A page outside `[1, page_count]`.
    #[error("page {page} is out of bounds (document has {page_count} pages)")]
    OutOfBounds {
        /// Requested page.
        page: u32,
        /// Pages in the document.
        page_count: u32,
    },
}

/// One comma-separated item of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRange {
    /// A single page.
    Single(u32),
    /// An inclusive span with `start <= end`.
    Span {
        /// First page.
        start: u32,
        /// Last page.
        end: u32,
    },
}

impl PageRange {
    /// Pages covered by this item, ascending.
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        let (start, end) = match *self {
            Self::Single(page) => (page, page),
            Self::Span { start, end } => (start, end),
        };
        start..=end
    }

    fn check_bounds(&self, page_count: u32) -> Result<(), SelectionError> {
        let (start, end) = match *self {
            Self::Single(page) => (page, page),
            Self::Span { start, end } => (start, end),
        };
        for page in [start, end] {
            if page == 0 || page > page_count {
                return Err(SelectionError::OutOfBounds { page, page_count });
            }
        }
        Ok(())
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(page) => write!(f, "{page}"),
            Self::Span { start, end } => write!(f, "{start}-{end}"),
        }
    }
}

fn parse_number(token: &str) -> Result<u32, SelectionError> {
    token.parse().map_err(|_| SelectionError::InvalidNumber {
        token: token.to_string(),
    })
}

/// Parse selection text into ranges without knowing the document.
///
/// # Errors
///
/// [`SelectionError::EmptySelection`] for blank input,
/// [`SelectionError::InvalidNumber`] for unparseable tokens (including empty
/// tokens between commas) and [`SelectionError::InvalidRange`] for reversed
/// spans.
pub fn parse_ranges(text: &str) -> Result<Vec<PageRange>, SelectionError> {
    if text.trim().is_empty() {
        return Err(SelectionError::EmptySelection);
    }

    text.split(',')
        .map(str::trim)
        .map(|token| match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_number(start.trim())?;
                let end = parse_number(end.trim())?;
                if start > end {
                    return Err(SelectionError::InvalidRange { start, end });
                }
                Ok(PageRange::Span { start, end })
            }
            None => parse_number(token).map(PageRange::Single),
        })
        .collect()
}

/// Check every range against a document's page count.
pub fn validate_ranges(ranges: &[PageRange], page_count: u32) -> Result<(), SelectionError> {
    ranges
        .iter()
        .try_for_each(|range| range.check_bounds(page_count))
}

/// Parse and bounds-check selection text, expanding it into page numbers.
///
/// Tokens are validated left to right; the first failure is returned.
pub fn parse(text: &str, page_count: u32) -> Result<Vec<u32>, SelectionError> {
    let ranges = parse_ranges(text)?;
    validate_ranges(&ranges, page_count)?;
    Ok(ranges.iter().flat_map(PageRange::pages).collect())
}

/// Which pages a split produces, and how they are grouped into files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSelection {
    /// One file per page.
    #[default]
    All,
    /// One file per page at 0-based indices 0, 2, 4, ... (pages 1, 3, 5, ...).
    Odd,
    /// One file per page at 0-based indices 1, 3, 5, ... (pages 2, 4, 6, ...).
    Even,
    /// One file per listed item, in the order given.
    Custom(Vec<PageRange>),
}

impl PageSelection {
    /// Build a custom selection from text, checking syntax only.
    pub fn custom(text: &str) -> Result<Self, SelectionError> {
        parse_ranges(text).map(Self::Custom)
    }

    /// Plan the output files of a split over `page_count` pages.
    pub fn plan(&self, page_count: u32) -> Result<Vec<SplitPart>, SelectionError> {
        let singles = |first: u32| {
            (first..=page_count)
                .step_by(2)
                .map(SplitPart::page)
                .collect::<Vec<_>>()
        };

        match self {
            Self::All => Ok((1..=page_count).map(SplitPart::page).collect()),
            Self::Odd => Ok(singles(1)),
            Self::Even => Ok(singles(2)),
            Self::Custom(ranges) => {
                validate_ranges(ranges, page_count)?;
                Ok(ranges.iter().map(SplitPart::from_range).collect())
            }
        }
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Odd => f.write_str("odd"),
            Self::Even => f.write_str("even"),
            Self::Custom(ranges) => {
                let items: Vec<String> = ranges.iter().map(ToString::to_string).collect();
                f.write_str(&items.join(","))
            }
        }
    }
}

/// Label of a split output, which determines its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartLabel {
    /// `{base}_page{n}.pdf`
    Page(u32),
    /// `{base}_pages{start}-{end}.pdf`
    Range(u32, u32),
}

/// One planned output document of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPart {
    /// Naming label.
    pub label: PartLabel,
    /// 1-based pages copied into this output, in order.
    pub pages: Vec<u32>,
}

impl SplitPart {
    fn page(page: u32) -> Self {
        Self {
            label: PartLabel::Page(page),
            pages: vec![page],
        }
    }

    fn from_range(range: &PageRange) -> Self {
        match *range {
            PageRange::Single(page) => Self::page(page),
            PageRange::Span { start, end } => Self {
                label: PartLabel::Range(start, end),
                pages: range.pages().collect(),
            },
        }
    }

    /// File name of this part for an input whose stem is `base`.
    pub fn file_name(&self, base: &str) -> String {
        match self.label {
            PartLabel::Page(page) => format!("{base}_page{page}.pdf"),
            PartLabel::Range(start, end) => format!("{base}_pages{start}-{end}.pdf"),
        }
    }
}
