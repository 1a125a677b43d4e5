//! Built-in advance-width tables for the two faces the engine sets text in.
//!
//! Widths are the standard AFM advances for Helvetica and Helvetica-Bold in
//! 1/1000 em units, covering printable ASCII. Characters outside the table
//! fall back to the face's average advance, which is all the accuracy the
//! wrapping algorithm needs.

/// Advance widths for U+0020..=U+007E, in 1/1000 em.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Average advance used for characters outside the ASCII table.
const DEFAULT_REGULAR: u16 = 556;
const DEFAULT_BOLD: u16 = 600;

/// Advance width of `ch` at `font_size` points in the regular face.
pub fn regular_width(ch: char, font_size: f64) -> f64 {
    scaled(&HELVETICA, DEFAULT_REGULAR, ch, font_size)
}

/// Advance width of `ch` at `font_size` points in the bold face.
pub fn bold_width(ch: char, font_size: f64) -> f64 {
    scaled(&HELVETICA_BOLD, DEFAULT_BOLD, ch, font_size)
}

fn scaled(table: &[u16; 95], default: u16, ch: char, font_size: f64) -> f64 {
    let units = match ch as u32 {
        0x20..=0x7E => table[(ch as usize) - 0x20],
        _ => default,
    };
    (units as f64 / 1000.0) * font_size
}
