// src/render/metrics.rs
//
// Advance widths for the two builtin fonts we draw with, in 1/1000 em
// (Adobe core font metrics, printable ASCII 32..=126).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //  !"#$%&'()*+,-./
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // 0-9
    278, 278, 584, 584, 584, 556, 1015,                                              // :;<=>?@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                 // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                 // N-Z
    278, 278, 278, 469, 556, 333,                                                    // [\]^_`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                 // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                 // n-z
    334, 260, 334, 584,                                                              // {|}~
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const FALLBACK_WIDTH: u16 = 556;

/// Width of `text` at `size` points, in points.
pub fn text_width(text: &str, style: FontStyle, size: f32) -> f32 {
    let table = match style {
        FontStyle::Regular => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(table, c))).sum();
    units as f32 * size / 1000.0
}

fn glyph_width(table: &[u16; 95], c: char) -> u16 {
    let c = fold_latin(c);
    match c as u32 {
        n @ 32..=126 => table[(n - 32) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// What the builtin fonts can actually show: accents folded, anything else
/// outside printable ASCII becomes `?`.
pub fn printable(text: &str) -> String {
    text.chars()
        .map(fold_latin)
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

/// Accented Latin-1 letters measure like their base letter.
fn fold_latin(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'º' | 'ª' => 'o',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_widths() {
        assert_eq!(text_width("W", FontStyle::Regular, 1000.0), 944.0);
        assert_eq!(text_width("il", FontStyle::Regular, 10.0), 4.44);
        assert!(text_width("bold", FontStyle::Bold, 11.0) > text_width("bold", FontStyle::Regular, 11.0));
    }

    #[test]
    fn accents_measure_like_base_letters() {
        assert_eq!(
            text_width("JOÃO", FontStyle::Bold, 18.0),
            text_width("JOAO", FontStyle::Bold, 18.0)
        );
    }

    #[test]
    fn unknown_glyphs_get_fallback() {
        assert_eq!(text_width("€", FontStyle::Regular, 1000.0), 556.0);
    }

    #[test]
    fn printable_folds_and_masks() {
        assert_eq!(printable("CONCEIÇÃO nº 5"), "CONCEICAO no 5");
        assert_eq!(printable("a€b"), "a?b");
    }
}
