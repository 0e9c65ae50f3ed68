//! Encrypt and decrypt against real documents on disk, plus the full
//! protect/unprotect cycle on the in-memory backend.

use crate::common::{page_labels, plain_engine, write_pdf};
use pdfutil::backend::MemoryBackend;
use pdfutil::config::OverwriteMode;
use pdfutil::engine::{Password, PdfEngine};
use rstest::rstest;
use pdfutil::error::ErrorKind;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[test]
fn test_encrypt_default_output_name() {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "report.pdf", "R", 2);
    let original = fs::read(&input).unwrap();

    let outcome = plain_engine()
        .encrypt(&input, &Password::new("secret"), None)
        .unwrap();

    let expected = temp.path().join("report_encrypted.pdf");
    assert_eq!(outcome.outputs, [expected.clone()]);
    assert_eq!(outcome.pages_written, 2);
    assert!(contains(&fs::read(&expected).unwrap(), b"/Encrypt"));
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn test_encrypt_explicit_output() {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "report.pdf", "R", 1);
    let output = temp.path().join("locked/secret.pdf");

    plain_engine()
        .encrypt(&input, &Password::new("secret"), Some(&output))
        .unwrap();

    assert!(output.exists());
    assert!(!temp.path().join("report_encrypted.pdf").exists());
}

#[test]
fn test_encrypt_missing_input() {
    let temp = TempDir::new().unwrap();
    let err = plain_engine()
        .encrypt(&temp.path().join("missing.pdf"), &Password::new("pw"), None)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn test_encrypt_no_clobber() {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "report.pdf", "R", 1);
    let existing = temp.path().join("report_encrypted.pdf");
    fs::write(&existing, b"already here").unwrap();

    let err = plain_engine()
        .with_overwrite_mode(OverwriteMode::NoClobber)
        .encrypt(&input, &Password::new("pw"), None)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::OutputExists);
    assert_eq!(fs::read(&existing).unwrap(), b"already here");
}

#[test]
fn test_decrypt_plain_document_is_untouched() {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "plain.pdf", "P", 2);
    let original = fs::read(&input).unwrap();

    let err = plain_engine()
        .decrypt(&input, &Password::new("pw"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotEncrypted);
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[rstest]
#[case::uncompressed(plain_engine())]
#[case::compressed(PdfEngine::new())]
fn test_encrypt_then_decrypt_in_place(#[case] engine: PdfEngine) {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "doc.pdf", "R", 3);
    let password = Password::new("secret");

    engine.encrypt(&input, &password, None).unwrap();
    let locked = temp.path().join("doc_encrypted.pdf");
    let locked_bytes = fs::read(&locked).unwrap();

    let err = engine.decrypt(&locked, &Password::new("wrong")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongPassword);
    assert_eq!(fs::read(&locked).unwrap(), locked_bytes);

    let outcome = engine.decrypt(&locked, &password).unwrap();
    assert_eq!(outcome.pages_written, 3);
    assert_eq!(outcome.outputs, [locked.clone()]);
    assert_eq!(page_labels(&locked), ["R-Page-1", "R-Page-2", "R-Page-3"]);

    let err = engine.decrypt(&locked, &password).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEncrypted);
}

#[test]
fn test_protect_then_unprotect_restores_pages() {
    let store = MemoryBackend::new();
    store.insert("doc.pdf", ["one", "two", "three"]);
    let engine = PdfEngine::with_backend(store.clone());
    let password = Password::new("hunter2");

    engine.encrypt(Path::new("doc.pdf"), &password, None).unwrap();
    let locked = Path::new("doc_encrypted.pdf");
    assert_eq!(store.is_protected(locked), Some(true));

    let err = engine.decrypt(locked, &Password::new("wrong")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongPassword);
    assert_eq!(store.is_protected(locked), Some(true));

    engine.decrypt(locked, &password).unwrap();
    assert_eq!(store.is_protected(locked), Some(false));
    assert_eq!(store.pages(locked).unwrap(), ["one", "two", "three"]);
}
