use crate::encoding::to_win_ansi;
use crate::error::RenderError;
use crate::font::EmbeddedFont;
use crate::meta::ReportMeta;
use crate::writer::PdfWriter;
use folio_resource::{FontFamily, FontRegistry, FontWeight};
use folio_sections::{BuiltSections, NO_DATA_TEXT, Section, SummarySection, TableSection, fit_row};
use folio_types::{Color, PageGeometry};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat, dictionary};
use log::{debug, info};
use std::sync::Arc;

const ELLIPSIS: char = '\u{2026}';

/// Font sizes, spacing and colors of a report, in points.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReportStyle {
    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub table_size: f32,
    pub footer_size: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    pub cell_padding: f32,
    pub section_spacing: f32,
    /// Height reserved above the bottom margin for the page footer.
    pub footer_band: f32,
    pub text_color: Color,
    pub muted_color: Color,
    pub rule_color: Color,
    pub header_fill: Color,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            title_size: 18.0,
            heading_size: 13.0,
            body_size: 10.0,
            table_size: 9.0,
            footer_size: 8.0,
            line_height: 1.5,
            cell_padding: 4.0,
            section_spacing: 14.0,
            footer_band: 16.0,
            text_color: Color::BLACK,
            muted_color: Color::gray(110),
            rule_color: Color::gray(205),
            header_fill: Color::gray(235),
        }
    }
}

/// Awaits font registration, then renders on the blocking pool.
pub async fn render_report_document(
    registry: &FontRegistry,
    sections: Arc<BuiltSections>,
    meta: ReportMeta,
    geometry: PageGeometry,
) -> Result<Vec<u8>, RenderError> {
    let family = registry.ensure_fonts_registered().await?;
    tokio::task::spawn_blocking(move || {
        ReportRenderer::new(&family)?.render(&sections, &meta, &geometry)
    })
    .await
    .map_err(|e| RenderError::Task(e.to_string()))?
}

/// Lays out report sections as a single-column flowing document.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    regular: EmbeddedFont,
    bold: EmbeddedFont,
    style: ReportStyle,
}

impl ReportRenderer {
    pub fn new(family: &FontFamily) -> Result<Self, RenderError> {
        Ok(Self {
            regular: EmbeddedFont::from_asset(family.asset(FontWeight::Regular), &family.name, "F1")?,
            bold: EmbeddedFont::from_asset(family.asset(FontWeight::Bold), &family.name, "F2")?,
            style: ReportStyle::default(),
        })
    }

    fn font(&self, weight: FontWeight) -> &EmbeddedFont {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    fn line_height(&self, size: f32) -> f32 {
        size * self.style.line_height
    }

    fn row_height(&self) -> f32 {
        self.line_height(self.style.table_size) + self.style.cell_padding
    }

    /// Renders `sections` into PDF bytes.
    pub fn render(
        &self,
        sections: &BuiltSections,
        meta: &ReportMeta,
        geometry: &PageGeometry,
    ) -> Result<Vec<u8>, RenderError> {
        self.check_geometry(geometry)?;

        let mut flow = Flow::new(self, *geometry);
        flow.header(meta);
        for section in sections.iter() {
            match section {
                Section::Summary(summary) => flow.summary(summary),
                Section::Table(table) => flow.table(table),
            }
        }
        let pages = flow.finish();
        let total = pages.len();
        debug!("Report laid out on {} pages", total);

        let mut writer = PdfWriter::new();
        let regular_id = self.regular.embed(&mut writer)?;
        let bold_id = self.bold.embed(&mut writer)?;
        writer.set_resources(dictionary! {
            "Font" => dictionary! {
                self.regular.resource_name() => regular_id,
                self.bold.resource_name() => bold_id,
            },
        });
        for (index, mut page) in pages.into_iter().enumerate() {
            page.footer(&format!("Page {} of {}", index + 1, total));
            writer.add_page(page.finish(), geometry.width, geometry.height)?;
        }
        writer.set_info(&meta.title, meta.generated_at);

        let bytes = writer.finish()?;
        info!(
            "Rendered report '{}' ({} sections, {} pages, {} bytes)",
            meta.title,
            sections.len(),
            total,
            bytes.len()
        );
        Ok(bytes)
    }

    fn check_geometry(&self, geometry: &PageGeometry) -> Result<(), RenderError> {
        let min_width = self.style.cell_padding * 4.0 + self.style.title_size;
        if geometry.content_width() < min_width {
            return Err(RenderError::Geometry(format!(
                "content width {:.1}pt on a {:.1}pt wide page with {:.1}pt margins",
                geometry.content_width(),
                geometry.width,
                geometry.margin
            )));
        }
        let min_height =
            self.style.footer_band + self.line_height(self.style.title_size) + 2.0 * self.row_height();
        if geometry.printable_height() < min_height {
            return Err(RenderError::Geometry(format!(
                "printable height {:.1}pt on a {:.1}pt tall page with {:.1}pt margins",
                geometry.printable_height(),
                geometry.height,
                geometry.margin
            )));
        }
        Ok(())
    }

    /// `text` shortened with an ellipsis until it fits in `max_width`.
    fn fit_text(&self, weight: FontWeight, text: &str, size: f32, max_width: f32) -> String {
        let font = self.font(weight);
        if font.text_width(text, size) <= max_width {
            return text.to_string();
        }
        let ellipsis_width = font.char_width(ELLIPSIS) as f32 * size / 1000.0;
        if ellipsis_width > max_width {
            return String::new();
        }
        let mut out = String::new();
        let mut width = ellipsis_width;
        for ch in text.chars() {
            let advance = font.char_width(ch) as f32 * size / 1000.0;
            if width + advance > max_width {
                break;
            }
            width += advance;
            out.push(ch);
        }
        let mut out = out.trim_end().to_string();
        out.push(ELLIPSIS);
        out
    }
}

// --- Page drawing ---

#[derive(Default, Clone, PartialEq)]
struct PageState {
    font: Option<(FontWeight, f32)>,
    fill: Option<Color>,
}

/// The content stream of one page, with y measured from the top edge.
struct PageContext<'a> {
    renderer: &'a ReportRenderer,
    geometry: PageGeometry,
    content: Content,
    state: PageState,
}

impl<'a> PageContext<'a> {
    fn new(renderer: &'a ReportRenderer, geometry: PageGeometry) -> Self {
        Self {
            renderer,
            geometry,
            content: Content { operations: vec![] },
            state: PageState::default(),
        }
    }

    fn finish(self) -> Content {
        self.content
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill != Some(color) {
            let [r, g, b] = color.to_unit_rgb();
            self.push("rg", vec![r.into(), g.into(), b.into()]);
            self.state.fill = Some(color);
        }
    }

    fn set_font(&mut self, weight: FontWeight, size: f32) {
        if self.state.font != Some((weight, size)) {
            let name = self.renderer.font(weight).resource_name().as_bytes().to_vec();
            self.push("Tf", vec![Object::Name(name), size.into()]);
            self.state.font = Some((weight, size));
        }
    }

    /// Draws `text` with its baseline `baseline` points below the top edge.
    fn text(&mut self, weight: FontWeight, size: f32, color: Color, x: f32, baseline: f32, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.push("BT", vec![]);
        self.set_font(weight, size);
        self.set_fill_color(color);
        let y = self.geometry.height - baseline;
        self.push("Td", vec![x.into(), y.into()]);
        self.push(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: Color) {
        self.set_fill_color(color);
        let y = self.geometry.height - top - height;
        self.push("re", vec![x.into(), y.into(), width.into(), height.into()]);
        self.push("f", vec![]);
    }

    fn rule(&mut self, x: f32, top: f32, width: f32, color: Color) {
        let [r, g, b] = color.to_unit_rgb();
        let y = self.geometry.height - top;
        self.push("RG", vec![r.into(), g.into(), b.into()]);
        self.push("w", vec![0.5f32.into()]);
        self.push("m", vec![x.into(), y.into()]);
        self.push("l", vec![(x + width).into(), y.into()]);
        self.push("S", vec![]);
    }

    fn footer(&mut self, text: &str) {
        let style = &self.renderer.style;
        let (size, color) = (style.footer_size, style.muted_color);
        let width = self.renderer.regular.text_width(text, size);
        let x = self.geometry.margin + (self.geometry.content_width() - width) / 2.0;
        let baseline = self.geometry.height - self.geometry.margin - (style.footer_band - size) / 2.0;
        self.text(FontWeight::Regular, size, color, x, baseline, text);
    }
}

// --- Flow layout ---

/// A top-to-bottom cursor over a growing list of pages.
struct Flow<'a> {
    renderer: &'a ReportRenderer,
    geometry: PageGeometry,
    done: Vec<PageContext<'a>>,
    page: PageContext<'a>,
    y: f32,
}

impl<'a> Flow<'a> {
    fn new(renderer: &'a ReportRenderer, geometry: PageGeometry) -> Self {
        Self {
            renderer,
            geometry,
            done: Vec::new(),
            page: PageContext::new(renderer, geometry),
            y: geometry.margin,
        }
    }

    fn finish(mut self) -> Vec<PageContext<'a>> {
        self.done.push(self.page);
        self.done
    }

    fn left(&self) -> f32 {
        self.geometry.margin
    }

    fn width(&self) -> f32 {
        self.geometry.content_width()
    }

    fn bottom(&self) -> f32 {
        self.geometry.height - self.geometry.margin - self.renderer.style.footer_band
    }

    /// Starts a new page unless `height` still fits. A block taller than a
    /// whole page is placed at the top of a fresh page and allowed to
    /// overflow. Returns whether a break happened.
    fn ensure(&mut self, height: f32) -> bool {
        let at_top = self.y <= self.geometry.margin;
        if self.y + height <= self.bottom() || at_top {
            return false;
        }
        let next = PageContext::new(self.renderer, self.geometry);
        self.done.push(std::mem::replace(&mut self.page, next));
        self.y = self.geometry.margin;
        true
    }

    /// One line of text; `baseline` sits a little below the vertical center.
    fn line(&mut self, weight: FontWeight, size: f32, color: Color, text: &str) {
        let height = self.renderer.line_height(size);
        self.ensure(height);
        let fitted = self.renderer.fit_text(weight, text, size, self.width());
        let baseline = self.y + baseline_offset(height, size);
        let x = self.left();
        self.page.text(weight, size, color, x, baseline, &fitted);
        self.y += height;
    }

    fn header(&mut self, meta: &ReportMeta) {
        let style = self.renderer.style.clone();
        self.line(FontWeight::Bold, style.title_size, style.text_color, &meta.title);
        for line in meta.header_lines() {
            self.line(FontWeight::Regular, style.body_size, style.muted_color, &line);
        }
        self.y += style.cell_padding;
        let (x, width, y) = (self.left(), self.width(), self.y);
        self.page.rule(x, y, width, style.rule_color);
        self.y += style.section_spacing;
    }

    /// A section title kept on the same page as the next `keep_with` points.
    fn heading(&mut self, title: &str, keep_with: f32) {
        let style = &self.renderer.style;
        let (size, color) = (style.heading_size, style.text_color);
        let height = self.renderer.line_height(size);
        self.ensure(height + keep_with);
        let fitted = self.renderer.fit_text(FontWeight::Bold, title, size, self.width());
        let baseline = self.y + baseline_offset(height, size);
        let x = self.left();
        self.page.text(FontWeight::Bold, size, color, x, baseline, &fitted);
        self.y += height;
    }

    fn summary(&mut self, summary: &SummarySection) {
        let style = self.renderer.style.clone();
        let size = style.body_size;
        let height = self.renderer.line_height(size) + style.cell_padding;
        self.heading(&summary.title, height);

        for (label, value) in &summary.entries {
            self.ensure(height);
            let (x, width) = (self.left(), self.width());
            let baseline = self.y + baseline_offset(height, size);

            let value = self.renderer.fit_text(FontWeight::Bold, value, size, width / 2.0);
            let value_width = self.renderer.bold.text_width(&value, size);
            let label_room = width - value_width - 2.0 * style.cell_padding;
            let label = self.renderer.fit_text(FontWeight::Regular, label, size, label_room);

            self.page
                .text(FontWeight::Regular, size, style.text_color, x, baseline, &label);
            self.page.text(
                FontWeight::Bold,
                size,
                style.text_color,
                x + width - value_width,
                baseline,
                &value,
            );
            self.y += height;
            let y = self.y;
            self.page.rule(x, y, width, style.rule_color);
        }
        self.y += style.section_spacing;
    }

    fn table(&mut self, table: &TableSection) {
        let style = self.renderer.style.clone();
        let row_height = self.renderer.row_height();
        let widths = self.column_widths(table);
        self.heading(&table.title, 2.0 * row_height);
        self.table_header(table, &widths);

        if table.is_placeholder() {
            if self.ensure(row_height) {
                self.table_header(table, &widths);
            }
            let (x, width) = (self.left(), self.width());
            let baseline = self.y + baseline_offset(row_height, style.table_size);
            self.page.text(
                FontWeight::Regular,
                style.table_size,
                style.muted_color,
                x + style.cell_padding,
                baseline,
                NO_DATA_TEXT,
            );
            self.y += row_height;
            let y = self.y;
            self.page.rule(x, y, width, style.rule_color);
        } else {
            for row in &table.rows {
                if self.ensure(row_height) {
                    self.table_header(table, &widths);
                }
                let cells = fit_row(row.clone(), table.headers.len());
                self.table_row(FontWeight::Regular, &cells, &widths);
            }
        }
        self.y += style.section_spacing;
    }

    fn table_header(&mut self, table: &TableSection, widths: &[f32]) {
        let row_height = self.renderer.row_height();
        self.ensure(row_height);
        let (x, y, width) = (self.left(), self.y, self.width());
        let fill = self.renderer.style.header_fill;
        self.page.fill_rect(x, y, width, row_height, fill);
        self.table_row(FontWeight::Bold, &table.headers, widths);
    }

    fn table_row(&mut self, weight: FontWeight, cells: &[String], widths: &[f32]) {
        let style = &self.renderer.style;
        let (size, padding, color, rule) = (
            style.table_size,
            style.cell_padding,
            style.text_color,
            style.rule_color,
        );
        let row_height = self.renderer.row_height();
        let baseline = self.y + baseline_offset(row_height, size);

        let mut x = self.left();
        for (cell, width) in cells.iter().zip(widths) {
            let text = self
                .renderer
                .fit_text(weight, cell, size, width - 2.0 * padding);
            self.page.text(weight, size, color, x + padding, baseline, &text);
            x += width;
        }
        self.y += row_height;
        let (left, y, width) = (self.left(), self.y, self.width());
        self.page.rule(left, y, width, rule);
    }

    /// Splits the content width between columns in proportion to their
    /// natural widths. No column asks for more than 40% of the table.
    fn column_widths(&self, table: &TableSection) -> Vec<f32> {
        let style = &self.renderer.style;
        let (size, padding) = (style.table_size, style.cell_padding);
        let total_width = self.width();
        let cap = total_width * 0.4;

        let natural: Vec<f32> = table
            .headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                let header_width = self.renderer.bold.text_width(header, size);
                let cell_width = if table.is_placeholder() {
                    0.0
                } else {
                    table
                        .rows
                        .iter()
                        .filter_map(|row| row.get(column))
                        .map(|cell| self.renderer.regular.text_width(cell, size))
                        .fold(0.0, f32::max)
                };
                (header_width.max(cell_width) + 2.0 * padding).min(cap)
            })
            .collect();

        let sum: f32 = natural.iter().sum();
        if sum <= 0.0 {
            let n = natural.len().max(1) as f32;
            return vec![total_width / n; natural.len()];
        }
        natural.iter().map(|w| total_width * w / sum).collect()
    }
}

fn baseline_offset(line_height: f32, size: f32) -> f32 {
    (line_height - size) / 2.0 + size * 0.8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flate2::read::ZlibDecoder;
    use folio_normalize::DefaultFormatter;
    use folio_resource::fixtures;
    use folio_sections::build_sections_from_value;
    use lopdf::Document;
    use serde_json::json;
    use std::io::Read;

    fn renderer() -> ReportRenderer {
        ReportRenderer::new(&fixtures::font_family()).unwrap()
    }

    fn a4() -> PageGeometry {
        PageGeometry::new(595.28, 841.89, 28.35)
    }

    fn meta() -> ReportMeta {
        ReportMeta::new("Sales Report")
            .with_company("Acme Ltd")
            .with_period("March 2024")
            .with_generated_at(Utc.with_ymd_and_hms(2024, 3, 31, 18, 0, 0).unwrap())
    }

    fn sections(bundle: serde_json::Value) -> BuiltSections {
        build_sections_from_value(&bundle, &DefaultFormatter::default())
    }

    /// Every string shown with `Tj`, page by page.
    fn page_texts(doc: &Document) -> Vec<Vec<Vec<u8>>> {
        doc.get_pages()
            .values()
            .map(|page_id| {
                let mut texts = Vec::new();
                for content_id in doc.get_page_contents(*page_id) {
                    let stream = doc.get_object(content_id).unwrap().as_stream().unwrap();
                    let mut raw = Vec::new();
                    ZlibDecoder::new(stream.content.as_slice())
                        .read_to_end(&mut raw)
                        .unwrap();
                    let content = Content::decode(&raw).unwrap();
                    for op in content.operations.iter().filter(|op| op.operator == "Tj") {
                        texts.push(op.operands[0].as_str().unwrap().to_vec());
                    }
                }
                texts
            })
            .collect()
    }

    fn contains(texts: &[Vec<u8>], needle: &str) -> bool {
        texts.iter().any(|t| t == needle.as_bytes())
    }

    #[test]
    fn test_sales_scenario_renders_placeholders() {
        let built = sections(json!({
            "sales": {
                "summary": {"totalSales": 1000, "totalOrders": 4, "totalDiscount": 0, "averageOrderValue": 250},
                "topItems": [], "topCustomers": [], "recentOrders": [], "chartData": []
            }
        }));
        let bytes = renderer().render(&built, &meta(), &a4()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let texts = &page_texts(&doc)[0];
        assert!(contains(texts, "Sales Summary"));
        assert!(contains(texts, "1,000"));
        let placeholders = texts.iter().filter(|t| t.as_slice() == NO_DATA_TEXT.as_bytes()).count();
        assert_eq!(placeholders, 4);
        assert!(contains(texts, "Page 1 of 1"));

        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_object(info_id).unwrap().as_dict().unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Sales Report");
    }

    #[test]
    fn test_header_omits_unset_fields() {
        let built = sections(json!({"customers": {}}));
        let bytes = renderer().render(&built, &meta(), &a4()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let texts = &page_texts(&doc)[0];

        assert!(contains(texts, "Acme Ltd"));
        assert!(contains(texts, "Period: March 2024"));
        assert!(contains(texts, "Generated: 2024-03-31 18:00 UTC"));
        assert!(!texts.iter().any(|t| t.starts_with(b"Email") || t.starts_with(b"Phone")));
    }

    #[test]
    fn test_long_table_repeats_header_on_every_page() {
        let items: Vec<_> = (0..120)
            .map(|i| json!({"name": format!("Item {}", i), "revenue": i * 10, "quantity": i}))
            .collect();
        let built = sections(json!({"sales": {"topItems": items}}));
        let bytes = renderer().render(&built, &meta(), &a4()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let pages = page_texts(&doc);
        assert!(pages.len() >= 3, "expected several pages, got {}", pages.len());

        let total = pages.len();
        for (index, texts) in pages.iter().enumerate() {
            assert!(contains(texts, &format!("Page {} of {}", index + 1, total)));
        }
        // Every page carrying rows of the first table also carries its header
        for texts in pages.iter().filter(|t| contains(t, "Item 119") || contains(t, "Item 60")) {
            assert!(contains(texts, "Item"));
            assert!(contains(texts, "Revenue"));
        }
        assert!(contains(&pages[0], "Item 0"));
    }

    #[test]
    fn test_overlong_cell_is_ellipsized() {
        let long_name = "Extremely long customer name ".repeat(20);
        let built = sections(json!({
            "customers": {"topCustomers": [{"name": long_name, "orders": 2, "totalSpent": 10}]}
        }));
        let bytes = renderer().render(&built, &meta(), &a4()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let texts = &page_texts(&doc)[0];
        let ellipsized = texts
            .iter()
            .find(|t| t.starts_with(b"Extremely"))
            .expect("name cell");
        assert_eq!(*ellipsized.last().unwrap(), 0x85);
        assert!(ellipsized.len() < long_name.len());
    }

    #[test]
    fn test_tiny_page_is_a_geometry_error() {
        let built = sections(json!({"sales": {}}));
        let result = renderer().render(&built, &meta(), &PageGeometry::new(100.0, 60.0, 20.0));
        assert!(matches!(result, Err(RenderError::Geometry(_))));
    }

    #[test]
    fn test_empty_bundle_still_renders_header() {
        let bytes = renderer()
            .render(&BuiltSections::default(), &meta(), &a4())
            .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(contains(&page_texts(&doc)[0], "Sales Report"));
    }

    #[test]
    fn test_fit_text() {
        let renderer = renderer();
        // Fixture glyphs are 500 units wide: 5pt per char at 10pt
        assert_eq!(renderer.fit_text(FontWeight::Regular, "abcd", 10.0, 20.0), "abcd");
        assert_eq!(renderer.fit_text(FontWeight::Regular, "abcdef", 10.0, 20.0), "abc\u{2026}");
        assert_eq!(renderer.fit_text(FontWeight::Regular, "abcdef", 10.0, 2.0), "");
    }
}
