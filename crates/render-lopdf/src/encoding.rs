//! WinAnsi (cp1252) text encoding for simple TrueType fonts.

// cp1252 code points 0x80..=0x9F that differ from Latin-1
const CP1252_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Encodes one character; `?` when WinAnsi has no code for it.
pub(crate) fn encode_char(ch: char) -> u8 {
    match ch {
        '\t' | '\n' | '\r' => b' ',
        '\u{0020}'..='\u{007E}' | '\u{00A0}'..='\u{00FF}' => ch as u8,
        _ => CP1252_HIGH
            .iter()
            .find(|(_, c)| *c == ch)
            .map(|(code, _)| *code)
            .unwrap_or(b'?'),
    }
}

/// Encodes `s` for a `Tj` string shown with a WinAnsi font.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(encode_char).collect()
}

/// The character a WinAnsi code stands for, if any.
pub(crate) fn decode_code(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as char),
        0x80..=0x9F => CP1252_HIGH.iter().find(|(c, _)| *c == code).map(|(_, ch)| *ch),
        _ => None,
    }
}
