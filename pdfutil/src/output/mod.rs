//! User-facing output for the command-line shell.
//!
//! # Examples
//!
//! ```no_run
//! use pdfutil::output::OutputFormatter;
//! use pdfutil::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::engine::OperationKind;
use crate::task::{BatchSummary, TaskReport};

/// Print one finished task as a status row.
pub fn display_task_report(formatter: &OutputFormatter, report: &TaskReport) {
    formatter.status_row(&report.path, &report.status_label(), report.is_success());
}

/// Print the aggregate line of a batch, e.g. "PDFs encrypted".
pub fn display_batch_summary(
    formatter: &OutputFormatter,
    kind: OperationKind,
    summary: &BatchSummary,
) {
    formatter.blank_line();
    if summary.all_succeeded() {
        formatter.success(&batch_message(kind));
    } else {
        formatter.warning(&format!(
            "{} of {} file(s) failed",
            summary.failed, summary.total
        ));
    }
    formatter.detail("Succeeded", &summary.succeeded.to_string());
    formatter.detail("Failed", &summary.failed.to_string());
}

/// Aggregate completion message for a batch of `kind`.
pub fn batch_message(kind: OperationKind) -> String {
    format!("PDFs {}", kind.past_tense().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_message() {
        assert_eq!(batch_message(OperationKind::Encrypt), "PDFs encrypted");
        assert_eq!(batch_message(OperationKind::Decrypt), "PDFs decrypted");
    }
}
