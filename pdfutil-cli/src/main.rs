//! pdfutil - Merge, split, encrypt and decrypt PDF files.

mod cli;

use clap::Parser;
use std::path::PathBuf;
use std::process;

use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, collect_inputs, require_password};
use pdfutil::backend::PdfBackend;
use pdfutil::config::Config;
use pdfutil::engine::{OperationKind, OperationOutcome, OperationRequest, Password, PdfEngine};
use pdfutil::error::PdfUtilError;
use pdfutil::output::{OutputFormatter, display_batch_summary, display_task_report};
use pdfutil::task::{TaskRecord, TaskRunner};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log to stderr. `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: bool) {
    let default = if verbose { "pdfutil=debug" } else { "pdfutil=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfUtilError> {
    cli.validate()?;
    let config = cli.to_config()?;

    let json = cli.json;
    // JSON output owns stdout.
    let formatter = if json {
        OutputFormatter::new(true, false)
    } else {
        OutputFormatter::from_config(&config)
    };
    let engine = PdfEngine::from_config(&config);

    if formatter.is_verbose() && !json {
        formatter.section(&format!("{} v{}", pdfutil::NAME, pdfutil::VERSION));
        formatter.blank_line();
    }

    match cli.command {
        Command::Merge(args) => {
            let inputs = collect_inputs(&args.inputs, args.recursive, args.sort.map(Into::into))?;
            let output = args.output_path();
            debug!(inputs = inputs.len(), "collected merge inputs");

            formatter.info(&format!("Merging {} file(s)...", inputs.len()));
            for input in &inputs {
                formatter.debug(&input.display().to_string());
            }

            let outcome = engine.merge(&inputs, &output)?;
            report_outcome(&formatter, json, &outcome, || {
                format!(
                    "Merged {} file(s) into {} ({} pages)",
                    inputs.len(),
                    output.display(),
                    outcome.pages_written
                )
            })
        }
        Command::Split(args) => {
            let selection = args.selection()?;
            formatter.info(&format!(
                "Splitting {} ({selection})...",
                args.input.display()
            ));

            let outcome = engine.split(&args.input, &args.out_dir, &selection)?;
            report_outcome(&formatter, json, &outcome, || {
                format!(
                    "Split {} into {} file(s) in {}",
                    args.input.display(),
                    outcome.outputs.len(),
                    args.out_dir.display()
                )
            })
        }
        Command::Encrypt(args) => {
            let password = require_password(args.password.as_deref())?;
            let inputs = args.expand_inputs()?;
            let output = args.output;
            run_batch(
                &engine,
                &config,
                &formatter,
                json,
                OperationKind::Encrypt,
                inputs,
                |input| OperationRequest::Encrypt {
                    input,
                    password: password.clone(),
                    output: output.clone(),
                },
            )
            .await
        }
        Command::Decrypt(args) => {
            let password: Password = require_password(args.password.as_deref())?;
            let inputs = collect_inputs(&args.inputs, false, None)?;
            run_batch(
                &engine,
                &config,
                &formatter,
                json,
                OperationKind::Decrypt,
                inputs,
                |input| OperationRequest::Decrypt {
                    input,
                    password: password.clone(),
                },
            )
            .await
        }
    }
}

/// Print a merge or split outcome as text or JSON.
fn report_outcome(
    formatter: &OutputFormatter,
    json: bool,
    outcome: &OperationOutcome,
    summary: impl FnOnce() -> String,
) -> Result<(), PdfUtilError> {
    if json {
        return print_json(outcome);
    }
    formatter.success(&summary());
    for output in &outcome.outputs {
        formatter.detail("Wrote", &output.display().to_string());
    }
    Ok(())
}

/// Run one task per input and report each file as it finishes.
///
/// Missing inputs are reported and skipped before any task starts.
async fn run_batch<B, F>(
    engine: &PdfEngine<B>,
    config: &Config,
    formatter: &OutputFormatter,
    json: bool,
    kind: OperationKind,
    inputs: Vec<PathBuf>,
    make_request: F,
) -> Result<(), PdfUtilError>
where
    B: PdfBackend,
    F: Fn(PathBuf) -> OperationRequest,
{
    if inputs.is_empty() {
        return Err(PdfUtilError::empty_input(kind));
    }

    let (accepted, mut records) = precheck_inputs(engine, kind, inputs);
    let skipped = records.len();
    if !json {
        for record in &records {
            formatter.status_row(&record.path, &record.message, false);
        }
    }

    let mut runner = TaskRunner::new(engine.clone());
    for input in accepted {
        runner.submit(make_request(input));
    }

    let summary = runner
        .join_all(|report| {
            if json {
                records.push(report.record());
            } else {
                display_task_report(formatter, report);
            }
        })
        .await;

    let failed = summary.failed + skipped;
    let total = summary.total + skipped;

    if json {
        print_json(&records)?;
    } else if config.should_print() || failed > 0 {
        if skipped == 0 {
            display_batch_summary(formatter, kind, &summary);
        } else {
            formatter.blank_line();
            formatter.warning(&format!("{failed} of {total} file(s) failed"));
        }
    }

    if failed > 0 {
        return Err(PdfUtilError::other(format!(
            "Error {} PDFs: {failed} of {total} file(s) failed",
            kind.gerund()
        )));
    }
    Ok(())
}

/// Split inputs into those that can run and failed records for the rest.
fn precheck_inputs<B: PdfBackend>(
    engine: &PdfEngine<B>,
    kind: OperationKind,
    inputs: Vec<PathBuf>,
) -> (Vec<PathBuf>, Vec<TaskRecord>) {
    let mut accepted = Vec::with_capacity(inputs.len());
    let mut rejected = Vec::new();
    for input in inputs {
        match engine.backend().check_input(&input) {
            Ok(()) => accepted.push(input),
            Err(err) => rejected.push(TaskRecord::rejected(input, kind, &err)),
        }
    }
    (accepted, rejected)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), PdfUtilError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| PdfUtilError::other(format!("Failed to serialize output: {err}")))?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfutil::backend::MemoryBackend;
    use pdfutil::task::TaskStatus;

    #[test]
    fn test_precheck_records_missing_inputs() {
        let store = MemoryBackend::new();
        store.insert("a.pdf", ["a1"]);
        let engine = PdfEngine::with_backend(store);

        let (accepted, rejected) = precheck_inputs(
            &engine,
            OperationKind::Encrypt,
            vec![PathBuf::from("a.pdf"), PathBuf::from("missing.pdf")],
        );

        assert_eq!(accepted, [PathBuf::from("a.pdf")]);
        assert_eq!(rejected.len(), 1);
        let record = &rejected[0];
        assert_eq!(record.path, PathBuf::from("missing.pdf"));
        assert_eq!(record.status, TaskStatus::Failed);
        assert_eq!(record.message, "File not found");
        assert!(record.outputs.is_empty());
        assert_eq!(
            serde_json::to_value(&rejected).unwrap()[0]["status"],
            "failed"
        );
    }
}
