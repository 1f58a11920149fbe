//! Synthetic TrueType fonts for tests.
//!
//! The fonts carry only the tables metrics are read from (`cmap`, `head`,
//! `hhea`, `hmtx`, `maxp`) and no outlines. Glyph 0 is `.notdef`, glyphs
//! 1..=95 map U+0020..=U+007E, every glyph has the same advance.

use crate::font::{CachedFontAsset, FontFamily, FontWeight};
use std::sync::Arc;

pub const UNITS_PER_EM: u16 = 1000;
pub const REGULAR_ADVANCE: u16 = 500;
pub const BOLD_ADVANCE: u16 = 600;

const NUM_GLYPHS: u16 = 96;

pub fn regular_font() -> Vec<u8> {
    build_font(REGULAR_ADVANCE)
}

pub fn bold_font() -> Vec<u8> {
    build_font(BOLD_ADVANCE)
}

/// A ready-made family built from [`regular_font`] and [`bold_font`].
pub fn font_family() -> FontFamily {
    let asset = |source: &str, weight, data| {
        CachedFontAsset::validated(source, weight, Arc::new(data))
            .expect("fixture fonts always parse")
    };
    FontFamily {
        name: "Fixture Sans".to_string(),
        regular: asset("memory://regular.ttf", FontWeight::Regular, regular_font()),
        bold: asset("memory://bold.ttf", FontWeight::Bold, bold_font()),
    }
}

fn build_font(advance: u16) -> Vec<u8> {
    // Table records must be sorted by tag
    let tables: [(&[u8; 4], Vec<u8>); 5] = [
        (b"cmap", cmap()),
        (b"head", head()),
        (b"hhea", hhea(advance)),
        (b"hmtx", hmtx(advance)),
        (b"maxp", maxp()),
    ];

    let num_tables = tables.len() as u16;
    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u16(&mut out, num_tables);
    push_u16(&mut out, 64); // searchRange
    push_u16(&mut out, 2); // entrySelector
    push_u16(&mut out, num_tables * 16 - 64); // rangeShift

    let mut offset = 12 + 16 * num_tables as u32;
    let mut body = Vec::new();
    for (tag, data) in &tables {
        out.extend_from_slice(*tag);
        push_u32(&mut out, checksum(data));
        push_u32(&mut out, offset);
        push_u32(&mut out, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * num_tables as u32 + body.len() as u32;
    }
    out.extend_from_slice(&body);
    out
}

fn head() -> Vec<u8> {
    let mut t = Vec::with_capacity(54);
    push_u32(&mut t, 0x0001_0000); // version
    push_u32(&mut t, 0x0001_0000); // fontRevision
    push_u32(&mut t, 0); // checkSumAdjustment
    push_u32(&mut t, 0x5F0F_3CF5); // magicNumber
    push_u16(&mut t, 0); // flags
    push_u16(&mut t, UNITS_PER_EM);
    t.extend_from_slice(&[0; 16]); // created, modified
    push_i16(&mut t, 0); // xMin
    push_i16(&mut t, -200); // yMin
    push_i16(&mut t, 1000); // xMax
    push_i16(&mut t, 800); // yMax
    push_u16(&mut t, 0); // macStyle
    push_u16(&mut t, 8); // lowestRecPPEM
    push_i16(&mut t, 2); // fontDirectionHint
    push_i16(&mut t, 0); // indexToLocFormat
    push_i16(&mut t, 0); // glyphDataFormat
    t
}

fn hhea(advance: u16) -> Vec<u8> {
    let mut t = Vec::with_capacity(36);
    push_u32(&mut t, 0x0001_0000);
    push_i16(&mut t, 800); // ascender
    push_i16(&mut t, -200); // descender
    push_i16(&mut t, 0); // lineGap
    push_u16(&mut t, advance); // advanceWidthMax
    push_i16(&mut t, 0); // minLeftSideBearing
    push_i16(&mut t, 0); // minRightSideBearing
    push_i16(&mut t, advance as i16); // xMaxExtent
    push_i16(&mut t, 1); // caretSlopeRise
    push_i16(&mut t, 0); // caretSlopeRun
    push_i16(&mut t, 0); // caretOffset
    t.extend_from_slice(&[0; 8]); // reserved
    push_i16(&mut t, 0); // metricDataFormat
    push_u16(&mut t, NUM_GLYPHS); // numberOfHMetrics
    t
}

fn hmtx(advance: u16) -> Vec<u8> {
    let mut t = Vec::with_capacity(NUM_GLYPHS as usize * 4);
    for _ in 0..NUM_GLYPHS {
        push_u16(&mut t, advance);
        push_i16(&mut t, 0);
    }
    t
}

fn maxp() -> Vec<u8> {
    let mut t = Vec::with_capacity(6);
    push_u32(&mut t, 0x0000_5000);
    push_u16(&mut t, NUM_GLYPHS);
    t
}

fn cmap() -> Vec<u8> {
    let mut t = Vec::new();
    push_u16(&mut t, 0); // version
    push_u16(&mut t, 1); // numTables
    push_u16(&mut t, 3); // Windows
    push_u16(&mut t, 1); // Unicode BMP
    push_u32(&mut t, 12);

    // format 4 with one real segment plus the 0xFFFF terminator
    push_u16(&mut t, 4);
    push_u16(&mut t, 32); // length
    push_u16(&mut t, 0); // language
    push_u16(&mut t, 4); // segCountX2
    push_u16(&mut t, 4); // searchRange
    push_u16(&mut t, 1); // entrySelector
    push_u16(&mut t, 0); // rangeShift
    push_u16(&mut t, 0x7E); // endCode
    push_u16(&mut t, 0xFFFF);
    push_u16(&mut t, 0); // reservedPad
    push_u16(&mut t, 0x20); // startCode
    push_u16(&mut t, 0xFFFF);
    push_u16(&mut t, 1u16.wrapping_sub(0x20)); // idDelta: U+0020 -> glyph 1
    push_u16(&mut t, 1);
    push_u16(&mut t, 0); // idRangeOffset
    push_u16(&mut t, 0);
    t
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_i16(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_font_parses_with_metrics() {
        let data = regular_font();
        let face = ttf_parser::Face::parse(&data, 0).unwrap();
        assert_eq!(face.units_per_em(), UNITS_PER_EM);
        assert_eq!(face.number_of_glyphs(), NUM_GLYPHS);

        let glyph = face.glyph_index('A').unwrap();
        assert_eq!(glyph.0, 'A' as u16 - 0x1F);
        assert_eq!(face.glyph_hor_advance(glyph), Some(REGULAR_ADVANCE));
        assert!(face.glyph_index('é').is_none());
    }

    #[test]
    fn test_bold_fixture_is_wider() {
        let data = bold_font();
        let face = ttf_parser::Face::parse(&data, 0).unwrap();
        let glyph = face.glyph_index('A').unwrap();
        assert_eq!(face.glyph_hor_advance(glyph), Some(BOLD_ADVANCE));
    }
}
