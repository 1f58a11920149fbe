#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use folio::{
    DownloadSink, ExportError, Exporter, FontFamilySources, InMemoryFontFetcher, MemorySink,
};
use folio_resource::fixtures as fonts;
use lopdf::Document as LopdfDocument;
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text shown on each page, in drawing order.
    pub fn page_texts(&self) -> Vec<Vec<String>> {
        pdf_assertions::page_texts(&self.doc)
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// A fetcher serving the synthetic fixture fonts.
pub fn fixture_fetcher() -> Arc<InMemoryFontFetcher> {
    let fetcher = InMemoryFontFetcher::new();
    fetcher
        .add("memory://regular.ttf", fonts::regular_font())
        .expect("add regular font");
    fetcher
        .add("memory://bold.ttf", fonts::bold_font())
        .expect("add bold font");
    Arc::new(fetcher)
}

pub fn fixture_sources() -> FontFamilySources {
    FontFamilySources::new("Fixture Sans", "memory://regular.ttf", "memory://bold.ttf")
}

/// An exporter on the fixture fonts that delivers into `sink`.
pub fn exporter_with_sink(sink: Arc<dyn DownloadSink>) -> Result<Exporter, ExportError> {
    Exporter::builder()
        .with_sink(sink)
        .with_font_fetcher(fixture_fetcher())
        .with_font_sources(fixture_sources())
        .build()
}

/// An exporter that collects documents in memory.
pub fn memory_exporter() -> (Exporter, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let exporter = exporter_with_sink(sink.clone()).expect("build exporter");
    (exporter, sink)
}

/// The single document a sink received.
pub fn single_delivery(sink: &MemorySink) -> (String, GeneratedPdf) {
    let mut delivered = sink.take();
    assert_eq!(delivered.len(), 1, "expected exactly one delivered document");
    let (filename, bytes) = delivered.remove(0);
    (filename, GeneratedPdf::from_bytes(bytes).expect("delivered bytes are a PDF"))
}
