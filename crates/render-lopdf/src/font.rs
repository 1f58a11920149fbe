use crate::encoding::{decode_code, encode_char};
use crate::error::RenderError;
use crate::writer::PdfWriter;
use folio_resource::{CachedFontAsset, FontWeight, SharedResourceData};
use lopdf::{Object, ObjectId, dictionary};
use ttf_parser::{Face, GlyphId, name_id};

const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 255;

/// A TrueType font embedded as a simple WinAnsi font.
///
/// Metrics are in glyph space (1000 units per em) so widths can be used for
/// both the `/Widths` array and for measuring text.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    resource_name: String,
    base_font: String,
    weight: FontWeight,
    widths: Vec<i64>,
    missing_width: i64,
    ascent: i64,
    descent: i64,
    cap_height: i64,
    bbox: [i64; 4],
    italic_angle: f32,
    fixed_pitch: bool,
    data: SharedResourceData,
}

impl EmbeddedFont {
    /// Reads the metrics of `asset`, to be referenced as `/resource_name`.
    pub fn from_asset(
        asset: &CachedFontAsset,
        family: &str,
        resource_name: &str,
    ) -> Result<Self, RenderError> {
        let face = Face::parse(&asset.data, 0)
            .map_err(|e| RenderError::Font(format!("{}: {}", asset.source_url, e)))?;
        let scale = 1000.0 / face.units_per_em().max(1) as f32;
        let to_glyph_space = |v: f32| (v * scale).round() as i64;

        let missing_width = to_glyph_space(face.glyph_hor_advance(GlyphId(0)).unwrap_or(0) as f32);
        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                decode_code(code)
                    .and_then(|ch| face.glyph_index(ch))
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|advance| to_glyph_space(advance as f32))
                    .unwrap_or(missing_width)
            })
            .collect();

        let bbox = face.global_bounding_box();
        let ascent = to_glyph_space(face.ascender() as f32);
        let base_font = postscript_name(&face).unwrap_or_else(|| match asset.weight {
            FontWeight::Regular => sanitize_font_name(family),
            FontWeight::Bold => format!("{}-Bold", sanitize_font_name(family)),
        });

        Ok(Self {
            resource_name: resource_name.to_string(),
            base_font,
            weight: asset.weight,
            widths,
            missing_width,
            ascent,
            descent: to_glyph_space(face.descender() as f32),
            cap_height: face
                .capital_height()
                .map(|h| to_glyph_space(h as f32))
                .unwrap_or(ascent),
            bbox: [
                to_glyph_space(bbox.x_min as f32),
                to_glyph_space(bbox.y_min as f32),
                to_glyph_space(bbox.x_max as f32),
                to_glyph_space(bbox.y_max as f32),
            ],
            italic_angle: face.italic_angle(),
            fixed_pitch: face.is_monospaced(),
            data: asset.data.clone(),
        })
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    /// Advance of `ch` in glyph space.
    pub fn char_width(&self, ch: char) -> i64 {
        let code = encode_char(ch);
        if code < FIRST_CHAR {
            return self.missing_width;
        }
        self.widths[(code - FIRST_CHAR) as usize]
    }

    /// Width of `text` set at `size` points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: i64 = text.chars().map(|ch| self.char_width(ch)).sum();
        units as f32 * size / 1000.0
    }

    /// Writes the font program, descriptor and font dictionary.
    pub fn embed(&self, writer: &mut PdfWriter) -> Result<ObjectId, RenderError> {
        let file_id = writer.add_compressed_stream(
            dictionary! { "Length1" => self.data.len() as i64 },
            &self.data,
        )?;

        // Nonsymbolic, plus FixedPitch when monospaced
        let flags: i64 = if self.fixed_pitch { 32 | 1 } else { 32 };
        let stem_v: i64 = match self.weight {
            FontWeight::Regular => 80,
            FontWeight::Bold => 140,
        };
        let descriptor = dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.base_font.as_bytes().to_vec()),
            "Flags" => flags,
            "FontBBox" => self.bbox.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
            "ItalicAngle" => self.italic_angle,
            "Ascent" => self.ascent,
            "Descent" => self.descent,
            "CapHeight" => self.cap_height,
            "StemV" => stem_v,
            "FontWeight" => self.weight.numeric() as i64,
            "MissingWidth" => self.missing_width,
            "FontFile2" => file_id,
        };
        let descriptor_id = writer.add_object(descriptor);

        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => Object::Name(self.base_font.as_bytes().to_vec()),
            "FirstChar" => FIRST_CHAR as i64,
            "LastChar" => LAST_CHAR as i64,
            "Widths" => self.widths.iter().map(|w| Object::Integer(*w)).collect::<Vec<_>>(),
            "FontDescriptor" => descriptor_id,
            "Encoding" => "WinAnsiEncoding",
        };
        Ok(writer.add_object(font))
    }
}

fn postscript_name(face: &Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == name_id::POST_SCRIPT_NAME)
        .find_map(|name| name.to_string())
        .map(|name| sanitize_font_name(&name))
        .filter(|name| !name.is_empty())
}

fn sanitize_font_name(name: &str) -> String {
    let out: String = name
        .chars()
        .filter_map(|ch| match ch {
            c if c.is_ascii_alphanumeric() || c == '-' => Some(c),
            ' ' => Some('-'),
            _ => None,
        })
        .collect();
    if out.is_empty() { "Font".to_string() } else { out }
}
