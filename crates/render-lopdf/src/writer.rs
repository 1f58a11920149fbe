use crate::error::RenderError;
use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::io::Write;

pub const PDF_VERSION: &str = "1.7";
pub const PRODUCER: &str = concat!("folio ", env!("CARGO_PKG_VERSION"));

/// Zlib-compresses `data` for a `FlateDecode` stream.
pub fn flate_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Assembles a PDF in memory.
///
/// The resources, pages and catalog objects get their ids up front so pages
/// can point at them before they exist; [`PdfWriter::finish`] fills them in.
pub struct PdfWriter {
    doc: Document,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
    catalog_id: ObjectId,
    page_ids: Vec<ObjectId>,
    resources: Dictionary,
    info: Option<Dictionary>,
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let resources_id = doc.new_object_id();
        let pages_id = doc.new_object_id();
        let catalog_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            resources_id,
            catalog_id,
            page_ids: Vec::new(),
            resources: Dictionary::new(),
            info: None,
        }
    }

    pub fn add_object(&mut self, object: impl Into<Object>) -> ObjectId {
        self.doc.add_object(object)
    }

    /// Adds a Flate-compressed stream; `dict` gets `Filter` and `Length`.
    pub fn add_compressed_stream(&mut self, mut dict: Dictionary, data: &[u8]) -> Result<ObjectId, RenderError> {
        let compressed = flate_compress(data)?;
        dict.set("Filter", "FlateDecode");
        Ok(self.doc.add_object(Stream::new(dict, compressed)))
    }

    /// Sets the resource dictionary shared by every page.
    pub fn set_resources(&mut self, resources: Dictionary) {
        self.resources = resources;
    }

    /// Appends a page of `width` x `height` points drawing `content`.
    pub fn add_page(&mut self, content: Content, width: f32, height: f32) -> Result<ObjectId, RenderError> {
        let encoded = content.encode()?;
        let content_id = self.add_compressed_stream(Dictionary::new(), &encoded)?;
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.0f32.into(), 0.0f32.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.doc.add_object(page);
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Document information dictionary: title, producer and creation date.
    pub fn set_info(&mut self, title: &str, created: DateTime<Utc>) {
        let date = created.format("D:%Y%m%d%H%M%SZ").to_string();
        self.info = Some(dictionary! {
            "Title" => text_string(title),
            "Producer" => text_string(PRODUCER),
            "CreationDate" => Object::String(date.into_bytes(), StringFormat::Literal),
        });
    }

    pub fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        if self.page_ids.is_empty() {
            return Err(RenderError::Pdf("document has no pages".into()));
        }
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));
        self.doc
            .objects
            .insert(self.resources_id, Object::Dictionary(self.resources));
        let catalog = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        self.doc.objects.insert(self.catalog_id, Object::Dictionary(catalog));
        self.doc.trailer.set("Root", self.catalog_id);
        if let Some(info) = self.info {
            let info_id = self.doc.add_object(info);
            self.doc.trailer.set("Info", info_id);
        }

        let mut out = Vec::new();
        self.doc
            .save_to(&mut out)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(out)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// A PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in s.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}
