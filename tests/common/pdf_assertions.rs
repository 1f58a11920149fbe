use flate2::read::ZlibDecoder;
use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object};
use std::io::Read;

/// Decodes a page content stream, inflating it when it is Flate-compressed.
pub fn content_operations(doc: &LopdfDocument, page_num: u32) -> Vec<(String, Vec<Object>)> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page_num) else {
        return Vec::new();
    };
    let mut ops = Vec::new();
    for content_id in doc.get_page_contents(*page_id) {
        let Ok(stream) = doc.get_object(content_id).and_then(|o| o.as_stream()) else {
            continue;
        };
        let compressed = stream
            .dict
            .get(b"Filter")
            .and_then(|f| f.as_name())
            .is_ok_and(|name| name == b"FlateDecode");
        let raw = if compressed {
            let mut out = Vec::new();
            ZlibDecoder::new(stream.content.as_slice())
                .read_to_end(&mut out)
                .expect("inflate content stream");
            out
        } else {
            stream.content.clone()
        };
        let content = Content::decode(&raw).expect("decode content stream");
        ops.extend(
            content
                .operations
                .into_iter()
                .map(|op| (op.operator, op.operands)),
        );
    }
    ops
}

/// Strings shown with `Tj` on each page. Bytes outside ASCII are mapped the
/// way the report fonts encode them where it matters for tests.
pub fn page_texts(doc: &LopdfDocument) -> Vec<Vec<String>> {
    (1..=doc.get_pages().len() as u32)
        .map(|page| {
            content_operations(doc, page)
                .into_iter()
                .filter(|(op, _)| op == "Tj")
                .filter_map(|(_, operands)| operands.first().and_then(|o| o.as_str().ok()).map(decode_win_ansi))
                .collect()
        })
        .collect()
}

fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x85 => '\u{2026}',
            b if b.is_ascii() => b as char,
            _ => '\u{FFFD}',
        })
        .collect()
}

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    page_texts(doc)
        .into_iter()
        .map(|texts| texts.join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// BaseFont names of every font object in the file.
pub fn extract_font_names(doc: &LopdfDocument) -> Vec<String> {
    doc.objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dict| dict.get(b"Type").and_then(|t| t.as_name()).is_ok_and(|t| t == b"Font"))
        .filter_map(|dict| dict.get(b"BaseFont").and_then(|f| f.as_name()).ok())
        .map(|name| String::from_utf8_lossy(name).to_string())
        .collect()
}

/// Number of image XObject streams in the file.
pub fn count_images(doc: &LopdfDocument) -> usize {
    doc.objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .is_ok_and(|s| s == b"Image")
        })
        .count()
}

/// Title from the document information dictionary.
pub fn info_title(doc: &LopdfDocument) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_object(info_id).ok()?.as_dict().ok()?;
    let title = info.get(b"Title").ok()?.as_str().ok()?;
    Some(String::from_utf8_lossy(title).to_string())
}

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert that PDF does NOT contain specific text
#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert minimum number of pages
#[macro_export]
macro_rules! assert_pdf_min_pages {
    ($pdf:expr, $min:expr) => {
        assert!(
            $pdf.page_count() >= $min,
            "Expected at least {} pages, got {}",
            $min,
            $pdf.page_count()
        );
    };
}

/// Assert that PDF contains a font matching a pattern
#[macro_export]
macro_rules! assert_pdf_has_font {
    ($pdf:expr, $pattern:expr) => {
        let fonts = $crate::common::pdf_assertions::extract_font_names(&$pdf.doc);
        assert!(
            fonts.iter().any(|f| f.contains($pattern)),
            "PDF should contain font matching '{}', fonts found: {:?}",
            $pattern,
            fonts
        );
    };
}
