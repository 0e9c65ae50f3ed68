//! Split against real documents on disk.

use crate::common::{file_names, page_labels, plain_engine, write_pdf};
use pdfutil::error::ErrorKind;
use pdfutil::selection::PageSelection;
use rstest::rstest;
use tempfile::TempDir;

#[test]
fn test_split_all_pages() {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "doc.pdf", "D", 3);
    let out_dir = temp.path().join("parts");

    let outcome = plain_engine()
        .split(&input, &out_dir, &PageSelection::All)
        .unwrap();

    assert_eq!(outcome.outputs.len(), 3);
    assert_eq!(outcome.pages_written, 3);
    assert_eq!(
        file_names(&out_dir),
        ["doc_page1.pdf", "doc_page2.pdf", "doc_page3.pdf"]
    );
    assert_eq!(page_labels(&out_dir.join("doc_page2.pdf")), ["D-Page-2"]);
}

#[rstest]
#[case(PageSelection::Odd, &["doc_page1.pdf", "doc_page3.pdf", "doc_page5.pdf"])]
#[case(PageSelection::Even, &["doc_page2.pdf", "doc_page4.pdf"])]
fn test_split_parity(#[case] selection: PageSelection, #[case] expected: &[&str]) {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "doc.pdf", "D", 5);
    let out_dir = temp.path().join("parts");

    plain_engine().split(&input, &out_dir, &selection).unwrap();

    assert_eq!(file_names(&out_dir), expected);
}

#[test]
fn test_split_custom_ranges() {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "doc.pdf", "D", 6);
    let out_dir = temp.path().join("parts");
    let selection = PageSelection::custom("2-3, 5").unwrap();

    let outcome = plain_engine().split(&input, &out_dir, &selection).unwrap();

    assert_eq!(outcome.pages_written, 3);
    assert_eq!(file_names(&out_dir), ["doc_page5.pdf", "doc_pages2-3.pdf"]);
    assert_eq!(
        page_labels(&out_dir.join("doc_pages2-3.pdf")),
        ["D-Page-2", "D-Page-3"]
    );
    assert_eq!(page_labels(&out_dir.join("doc_page5.pdf")), ["D-Page-5"]);
}

#[test]
fn test_split_out_of_bounds_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let input = write_pdf(temp.path(), "doc.pdf", "D", 3);
    let out_dir = temp.path().join("parts");
    let selection = PageSelection::custom("2-4").unwrap();

    let err = plain_engine().split(&input, &out_dir, &selection).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidSelection);
    assert!(file_names(&out_dir).is_empty());
}

#[test]
fn test_split_missing_input() {
    let temp = TempDir::new().unwrap();
    let err = plain_engine()
        .split(
            &temp.path().join("missing.pdf"),
            temp.path(),
            &PageSelection::All,
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}
