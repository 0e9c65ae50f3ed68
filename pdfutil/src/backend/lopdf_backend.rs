//! [`PdfBackend`] implementation on top of `lopdf`.
//!
//! Pages are copied object by object. Each referenced object is imported once
//! per source document, so pages that share fonts or images keep sharing them
//! in the output. Attributes a page inherits from its ancestors in the page
//! tree are copied onto the page itself, since the source tree is never
//! imported.
//!
//! `Document::load` only unlocks files whose user password is empty, and drops
//! the objects it cannot read. Protected files therefore keep their raw bytes
//! until [`PdfBackend::decrypt_with`] re-parses them with the real password.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use lopdf::encryption::{EncryptionState, EncryptionVersion, Permissions};
use lopdf::xref::XrefEntry;
use lopdf::{Dictionary, Document, Object, ObjectId, Reader, StringFormat, dictionary};
use tracing::debug;

use super::{BackendError, PdfBackend};
use crate::config::{CompressionLevel, Config};

/// Page attributes that may be inherited from `/Pages` nodes.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Distinguishes documents in import maps.
static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Compression applied before writing.
    pub compression: CompressionLevel,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: CompressionLevel::default(),
            buffer_size: 8192,
        }
    }
}

/// A `lopdf` document plus the bookkeeping needed to copy pages into it.
#[derive(Debug)]
pub struct LopdfDocument {
    inner: Document,
    origin: u64,
    pages_id: Option<ObjectId>,
    page_ids: Vec<ObjectId>,
    imported: HashMap<(u64, ObjectId), ObjectId>,
    password: Option<String>,
    raw: Option<Vec<u8>>,
}

impl LopdfDocument {
    fn new(inner: Document, pages_id: Option<ObjectId>) -> Self {
        let page_ids = inner.get_pages().into_values().collect();
        Self {
            inner,
            origin: NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed),
            pages_id,
            page_ids,
            imported: HashMap::new(),
            password: None,
            raw: None,
        }
    }

    fn empty() -> Self {
        let mut inner = Document::with_version("1.5");
        let pages_id = inner.new_object_id();
        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self::new(inner, Some(pages_id))
    }

    /// Borrow the underlying `lopdf` document.
    pub fn document(&self) -> &Document {
        &self.inner
    }

    /// Take ownership of the underlying `lopdf` document.
    pub fn into_inner(self) -> Document {
        self.inner
    }

    fn pages_root(&mut self) -> Result<ObjectId, BackendError> {
        if let Some(id) = self.pages_id {
            return Ok(id);
        }
        let id = self
            .inner
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|e| BackendError::Malformed(format!("missing page tree: {e}")))?;
        self.pages_id = Some(id);
        Ok(id)
    }

    fn append_page(&mut self, page: Dictionary) -> Result<(), BackendError> {
        let pages_id = self.pages_root()?;

        let mut page = page;
        page.set("Parent", pages_id);
        let page_id = self.inner.add_object(page);
        self.page_ids.push(page_id);

        let kids: Vec<Object> = self.page_ids.iter().copied().map(Object::from).collect();
        let count = self.page_ids.len() as i64;
        let pages = self
            .inner
            .get_dictionary_mut(pages_id)
            .map_err(|e| BackendError::Malformed(format!("invalid page tree: {e}")))?;
        pages.set("Kids", kids);
        pages.set("Count", count);
        Ok(())
    }

    fn ensure_id(&mut self) {
        if self.inner.trailer.get(b"ID").is_ok() {
            return;
        }
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let id = format!("{timestamp:024x}{:08x}", self.origin).into_bytes();
        self.inner.trailer.set(
            "ID",
            vec![
                Object::String(id.clone(), StringFormat::Hexadecimal),
                Object::String(id, StringFormat::Hexadecimal),
            ],
        );
    }
}

/// Re-parse every object of a protected file from its bytes, still encrypted.
fn restore_objects(doc: &mut Document, bytes: &[u8]) {
    let start = bytes.windows(5).position(|w| w == b"%PDF-").unwrap_or(0);
    let ids: Vec<ObjectId> = doc
        .reference_table
        .entries
        .iter()
        .filter_map(|(&number, entry)| match entry {
            XrefEntry::Normal { generation, .. } => Some((number, *generation)),
            _ => None,
        })
        .collect();

    let reader = Reader {
        buffer: &bytes[start..],
        document: doc.clone(),
        encryption_state: None,
        raw_objects: BTreeMap::new(),
    };
    let mut objects = BTreeMap::new();
    for id in ids {
        match reader.get_object(id, &mut HashSet::new()) {
            Ok(object) => {
                objects.insert(id, object);
            }
            Err(e) => debug!(object = ?id, error = %e, "skipping unreadable object"),
        }
    }
    doc.objects = objects;
}

/// Fail unless the catalog reaches a page tree whose `/Count` matches `found`.
fn check_page_tree(doc: &Document, found: usize) -> Result<(), BackendError> {
    let count = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .and_then(|pages| pages.get(b"Count"))
        .and_then(|count| doc.dereference(count))
        .and_then(|(_, count)| count.as_i64())
        .map_err(|e| BackendError::Malformed(format!("missing page tree: {e}")))?;
    if count != found as i64 {
        return Err(BackendError::Malformed(format!(
            "page tree lists {count} pages but {found} were found"
        )));
    }
    Ok(())
}

/// Walk `/Parent` links from `page_id` until `key` is found.
fn resolve_inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = page_id;
    // Bounded to survive cyclic /Parent chains.
    for _ in 0..64 {
        let dict = doc.get_dictionary(current).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

fn is_page_tree_node(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}

/// Copies objects from one document into another, renumbering references.
struct Importer<'a> {
    source: &'a Document,
    origin: u64,
    dest: &'a mut Document,
    imported: &'a mut HashMap<(u64, ObjectId), ObjectId>,
}

impl Importer<'_> {
    fn import(&mut self, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.import_reference(*id),
            Object::Array(items) => Object::Array(items.iter().map(|o| self.import(o)).collect()),
            Object::Dictionary(dict) => Object::Dictionary(self.import_dictionary(dict)),
            Object::Stream(stream) => {
                let mut stream = stream.clone();
                stream.dict = self.import_dictionary(&stream.dict);
                Object::Stream(stream)
            }
            other => other.clone(),
        }
    }

    fn import_dictionary(&mut self, dict: &Dictionary) -> Dictionary {
        let mut out = Dictionary::new();
        for (key, value) in dict.iter() {
            out.set(key.clone(), self.import(value));
        }
        out
    }

    fn import_reference(&mut self, id: ObjectId) -> Object {
        if let Some(&new_id) = self.imported.get(&(self.origin, id)) {
            return Object::Reference(new_id);
        }
        let source = self.source;
        let object = match source.get_object(id) {
            Ok(object) if !is_page_tree_node(object) => object,
            // Dangling references and links to other pages become null.
            _ => return Object::Null,
        };

        let new_id = self.dest.new_object_id();
        self.imported.insert((self.origin, id), new_id);
        let copy = self.import(object);
        self.dest.objects.insert(new_id, copy);
        Object::Reference(new_id)
    }
}

/// Backend that reads and writes PDF files with `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfBackend {
    options: WriteOptions,
}

impl LopdfBackend {
    /// Create a backend with default write options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with custom write options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a backend honoring the configured compression level.
    pub fn from_config(config: &Config) -> Self {
        Self::with_options(WriteOptions {
            compression: config.compression,
            ..WriteOptions::default()
        })
    }

    /// Current write options.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    fn encrypt(doc: &mut LopdfDocument, password: &str) -> io::Result<()> {
        doc.ensure_id();
        let version = EncryptionVersion::V2 {
            document: &doc.inner,
            owner_password: password,
            user_password: password,
            key_length: 128,
            permissions: Permissions::default(),
        };
        let state = EncryptionState::try_from(version).map_err(io::Error::other)?;
        doc.inner.encrypt(&state).map_err(io::Error::other)
    }
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;

    fn open(&self, path: &Path) -> Result<Self::Document, BackendError> {
        let bytes = fs::read(path).map_err(|e| BackendError::Malformed(e.to_string()))?;
        let inner = Document::load_mem(&bytes).map_err(|e| {
            let message = e.to_string();
            if message.contains("encrypt") || message.contains("password") {
                BackendError::Encrypted
            } else {
                BackendError::Malformed(message)
            }
        })?;
        let raw = inner.is_encrypted().then_some(bytes);
        Ok(LopdfDocument {
            raw,
            ..LopdfDocument::new(inner, None)
        })
    }

    fn create(&self) -> Self::Document {
        LopdfDocument::empty()
    }

    fn page_count(&self, doc: &Self::Document) -> u32 {
        doc.page_ids.len() as u32
    }

    fn copy_page(
        &self,
        dest: &mut Self::Document,
        src: &Self::Document,
        index: u32,
    ) -> Result<(), BackendError> {
        let page_id = *src.page_ids.get(index as usize).ok_or_else(|| {
            BackendError::Malformed(format!("page {} does not exist", index + 1))
        })?;
        let mut page = src
            .inner
            .get_dictionary(page_id)
            .map_err(|e| BackendError::Malformed(format!("page {}: {e}", index + 1)))?
            .clone();

        for key in INHERITABLE {
            if !page.has(key)
                && let Some(value) = resolve_inherited(&src.inner, page_id, key)
            {
                page.set(key, value.clone());
            }
        }
        page.remove(b"Parent");

        let page = Importer {
            source: &src.inner,
            origin: src.origin,
            dest: &mut dest.inner,
            imported: &mut dest.imported,
        }
        .import_dictionary(&page);

        dest.append_page(page)
    }

    fn set_password(&self, doc: &mut Self::Document, password: &str) {
        doc.password = Some(password.to_string());
    }

    fn is_encrypted(&self, doc: &Self::Document) -> bool {
        doc.inner.is_encrypted()
    }

    fn decrypt_with(&self, doc: &mut Self::Document, password: &str) -> Result<bool, BackendError> {
        if doc.inner.authenticate_password(password).is_err() {
            return Ok(false);
        }
        if let Some(bytes) = doc.raw.take() {
            restore_objects(&mut doc.inner, &bytes);
        }
        doc.inner
            .decrypt(password)
            .map_err(|e| BackendError::Malformed(format!("cannot decrypt: {e}")))?;

        doc.pages_id = None;
        doc.page_ids = doc.inner.get_pages().into_values().collect();
        check_page_tree(&doc.inner, doc.page_ids.len())?;
        Ok(true)
    }

    fn write(&self, doc: &mut Self::Document, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        match self.options.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => doc.inner.compress(),
            CompressionLevel::Maximum => {
                doc.inner.prune_objects();
                doc.inner.compress();
            }
        }

        if let Some(password) = doc.password.take() {
            Self::encrypt(doc, &password)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(self.options.buffer_size, file);
        doc.inner.save_to(&mut writer).map_err(io::Error::other)?;
        writer.flush()
    }
}
