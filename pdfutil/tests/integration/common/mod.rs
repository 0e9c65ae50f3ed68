//! Shared helpers for integration tests.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use pdfutil::config::{CompressionLevel, Config};
use pdfutil::engine::PdfEngine;
use std::path::{Path, PathBuf};

/// Build a document of `pages` pages whose content streams show
/// `"{label}-Page-{n}"`.
pub fn create_pdf(label: &str, pages: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content = format!("BT /F1 12 Tf 50 700 Td ({label}-Page-{n}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::from(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Write a generated document to `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, label: &str, pages: u32) -> PathBuf {
    let path = dir.join(name);
    let mut doc = create_pdf(label, pages);
    doc.save(&path).expect("Failed to write fixture");
    path
}

/// Page labels of a PDF on disk, in page order.
pub fn page_labels(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load output");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).expect("Missing page content");
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').map_or(0, |i| i + 1);
            let end = text.rfind(')').unwrap_or(text.len());
            text[start..end].to_string()
        })
        .collect()
}

/// Engine writing uncompressed output, so content streams stay readable.
pub fn plain_engine() -> PdfEngine {
    PdfEngine::from_config(&Config {
        compression: CompressionLevel::None,
        ..Config::default()
    })
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_fixture_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_pdf(temp.path(), "fixture.pdf", "F", 3);
        assert_eq!(page_labels(&path), ["F-Page-1", "F-Page-2", "F-Page-3"]);
    }
}
