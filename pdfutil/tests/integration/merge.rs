//! Merge against real documents on disk.

use crate::common::{page_labels, plain_engine, write_pdf};
use lopdf::Document;
use pdfutil::config::OverwriteMode;
use pdfutil::engine::PdfEngine;
use pdfutil::error::ErrorKind;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_merge_preserves_input_order() {
    let temp = TempDir::new().unwrap();
    let a = write_pdf(temp.path(), "a.pdf", "A", 2);
    let b = write_pdf(temp.path(), "b.pdf", "B", 3);
    let output = temp.path().join("merged.pdf");

    let outcome = plain_engine().merge(&[a, b], &output).unwrap();

    assert_eq!(outcome.pages_written, 5);
    assert_eq!(outcome.outputs, [output.clone()]);
    assert_eq!(
        page_labels(&output),
        ["A-Page-1", "A-Page-2", "B-Page-1", "B-Page-2", "B-Page-3"]
    );
}

#[test]
fn test_merge_same_file_twice() {
    let temp = TempDir::new().unwrap();
    let a = write_pdf(temp.path(), "a.pdf", "A", 2);
    let output = temp.path().join("twice.pdf");

    plain_engine().merge(&[a.clone(), a], &output).unwrap();

    assert_eq!(
        page_labels(&output),
        ["A-Page-1", "A-Page-2", "A-Page-1", "A-Page-2"]
    );
}

#[test]
fn test_merge_with_default_compression() {
    let temp = TempDir::new().unwrap();
    let a = write_pdf(temp.path(), "a.pdf", "A", 1);
    let b = write_pdf(temp.path(), "b.pdf", "B", 4);
    let output = temp.path().join("out/merged.pdf");

    PdfEngine::new().merge(&[a, b], &output).unwrap();

    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 5);
}

#[test]
fn test_merge_missing_input_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let a = write_pdf(temp.path(), "a.pdf", "A", 1);
    let output = temp.path().join("merged.pdf");

    let err = plain_engine()
        .merge(&[a, temp.path().join("missing.pdf")], &output)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert!(!output.exists());
}

#[test]
fn test_merge_empty_input() {
    let temp = TempDir::new().unwrap();
    let err = plain_engine()
        .merge(&[], &temp.path().join("merged.pdf"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyInput);
    assert_eq!(err.to_string(), "Error merging: no input files");
}

#[test]
fn test_merge_corrupt_input() {
    let temp = TempDir::new().unwrap();
    let a = write_pdf(temp.path(), "a.pdf", "A", 1);
    let broken = temp.path().join("broken.pdf");
    fs::write(&broken, b"this is not a pdf").unwrap();
    let output = temp.path().join("merged.pdf");

    let err = plain_engine().merge(&[a, broken], &output).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Open);
    assert!(!output.exists());
}

#[test]
fn test_merge_no_clobber() {
    let temp = TempDir::new().unwrap();
    let a = write_pdf(temp.path(), "a.pdf", "A", 1);
    let output = temp.path().join("merged.pdf");
    fs::write(&output, b"keep me").unwrap();

    let engine = plain_engine().with_overwrite_mode(OverwriteMode::NoClobber);
    let err = engine.merge(&[a], &output).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::OutputExists);
    assert_eq!(fs::read(&output).unwrap(), b"keep me");
}
