//! Concurrent per-file tasks over real documents.

use crate::common::{plain_engine, write_pdf};
use pdfutil::engine::{OperationRequest, Password};
use pdfutil::task::{TaskRunner, TaskStatus};
use std::path::PathBuf;
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_encrypt_batch_reports_every_file() {
    let temp = TempDir::new().unwrap();
    let mut inputs: Vec<PathBuf> = (1..=4)
        .map(|n| write_pdf(temp.path(), &format!("doc{n}.pdf"), "D", n))
        .collect();
    inputs.push(temp.path().join("missing.pdf"));

    let mut runner = TaskRunner::new(plain_engine());
    let mut handles = Vec::new();
    for input in &inputs {
        handles.push(runner.submit(OperationRequest::Encrypt {
            input: input.clone(),
            password: Password::new("secret"),
            output: None,
        }));
    }

    let mut seen = 0;
    let summary = runner.join_all(|_| seen += 1).await;

    assert_eq!(seen, 5);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 1);
    assert!(!summary.all_succeeded());

    let failed = summary
        .reports
        .iter()
        .find(|report| !report.is_success())
        .unwrap();
    assert_eq!(failed.path, temp.path().join("missing.pdf"));
    assert_eq!(failed.status_label(), "File not found");

    for n in 1..=4 {
        assert!(temp.path().join(format!("doc{n}_encrypted.pdf")).exists());
    }
    for mut handle in handles {
        assert!(handle.wait().await.is_terminal());
    }
}

#[tokio::test]
async fn test_handle_tracks_completion() {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "doc.pdf", "D", 1);

    let mut runner = TaskRunner::new(plain_engine());
    let mut handle = runner.submit(OperationRequest::Encrypt {
        input: input.clone(),
        password: Password::new("secret"),
        output: None,
    });
    assert_eq!(handle.path(), input.as_path());

    let report = runner.next_report().await.unwrap();
    assert_eq!(report.id, handle.id());
    assert_eq!(handle.wait().await, TaskStatus::Succeeded);
    assert!(runner.next_report().await.is_none());
}
