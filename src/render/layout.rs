// src/render/layout.rs
//
// Pure page layout: one enriched record in, a list of draw ops out.
// Units are PDF points, origin bottom-left; the backend converts.

use crate::specs::details::EnrichedRecord;

use super::metrics::{FontStyle, text_width};

pub const MM: f32 = 72.0 / 25.4;

pub const PAGE_W: f32 = 210.0 * MM;
pub const PAGE_H: f32 = 297.0 * MM;
pub const MARGIN: f32 = 20.0 * MM;
pub const PHOTO_BOX_W: f32 = 70.0 * MM;
pub const PHOTO_BOX_H: f32 = 90.0 * MM;
pub const COLUMN_GAP: f32 = 10.0 * MM;
pub const LINE_SPACING: f32 = 5.0;

const TITLE_SIZE: f32 = 18.0;
const SUBTITLE_SIZE: f32 = 11.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 11.0;

pub const PERSONAL_FIELDS: &[(&str, &str)] = &[
    ("Mother", "mother"),
    ("Father", "father"),
    ("Birth date", "birth_date"),
    ("Document", "document"),
    ("Origin city", "origin_city"),
    ("Origin state", "origin_state"),
    ("Address", "address"),
];

pub const FEATURE_FIELDS: &[(&str, &str)] = &[
    ("Ethnicity", "ethnicity"),
    ("Face", "face"),
    ("Eyes", "eyes"),
    ("Nose", "nose"),
    ("Mouth", "mouth"),
    ("Teeth", "teeth"),
    ("Hair", "hair"),
    ("Height", "height"),
    ("Distinguishing marks", "marks"),
];

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text { x: f32, y: f32, size: f32, style: FontStyle, text: String },
    /// Fitted photo rectangle (bottom-left corner + size)
    Photo { x: f32, y: f32, w: f32, h: f32 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    fn text(&mut self, x: f32, y: f32, size: f32, style: FontStyle, text: impl Into<String>) {
        self.ops.push(DrawOp::Text { x, y, size, style, text: text.into() });
    }

    /// All text runs in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Photo { .. } => None,
        })
    }

    pub fn photo_rect(&self) -> Option<(f32, f32, f32, f32)> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Photo { x, y, w, h } => Some((*x, *y, *w, *h)),
            DrawOp::Text { .. } => None,
        })
    }
}

/// Greedy line fill on whitespace-separated words. A single word wider than
/// `max_width` gets a line of its own.
pub fn wrap_text(text: &str, style: FontStyle, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() { s!(word) } else { join!(&line, " ", word) };
        if line.is_empty() || text_width(&candidate, style, size) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, s!(word)));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Scale `(w, h)` to the largest size fitting `(max_w, max_h)` with the same aspect.
pub fn fit_box(w: f32, h: f32, max_w: f32, max_h: f32) -> (f32, f32) {
    if w <= 0.0 || h <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (max_w / w).min(max_h / h);
    (w * scale, h * scale)
}

/// Lay out one record. `photo_px` is the decoded photo size, when there is one.
pub fn layout_page(rec: &EnrichedRecord, photo_px: Option<(u32, u32)>) -> PageLayout {
    let mut page = PageLayout::default();
    let top = PAGE_H - MARGIN;

    page.text(MARGIN, top, TITLE_SIZE, FontStyle::Bold, rec.get("name"));
    let subtitle = format!(
        "ID: {}   |   Wing: {}   |   Cell: {}",
        rec.get("id"),
        rec.get("wing"),
        rec.get("cell")
    );
    page.text(MARGIN, top - 18.0, SUBTITLE_SIZE, FontStyle::Regular, subtitle);

    let photo_top = top - 18.0 - 14.0 - 6.0;
    if let Some((pw, ph)) = photo_px {
        let (w, h) = fit_box(pw as f32, ph as f32, PHOTO_BOX_W, PHOTO_BOX_H);
        if w > 0.0 && h > 0.0 {
            page.ops.push(DrawOp::Photo { x: MARGIN, y: photo_top - PHOTO_BOX_H, w, h });
        }
    }

    let col_x = MARGIN + PHOTO_BOX_W + COLUMN_GAP;
    let col_w = PAGE_W - MARGIN - col_x;
    let mut y = photo_top;

    page.text(col_x, y, HEADING_SIZE, FontStyle::Bold, "Personal data");
    y -= 16.0;
    y = put_fields(&mut page, rec, PERSONAL_FIELDS, col_x, col_w, y);

    y -= 6.0;
    page.text(col_x, y, HEADING_SIZE, FontStyle::Bold, "Features");
    y -= 16.0;
    put_fields(&mut page, rec, FEATURE_FIELDS, col_x, col_w, y);

    page
}

fn put_fields(
    page: &mut PageLayout,
    rec: &EnrichedRecord,
    fields: &[(&str, &str)],
    x: f32,
    width: f32,
    mut y: f32,
) -> f32 {
    for (label, key) in fields {
        let value = rec.get(key).trim();
        if value.is_empty() {
            continue;
        }
        page.text(x, y, BODY_SIZE, FontStyle::Bold, format!("{label}:"));
        y -= BODY_SIZE + 2.0;
        for line in wrap_text(value, FontStyle::Regular, BODY_SIZE, width) {
            page.text(x, y, BODY_SIZE, FontStyle::Regular, line);
            y -= BODY_SIZE + LINE_SPACING;
        }
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::details::DetailFields;
    use crate::specs::roster::Record;

    fn record(extra: &[(&str, &str)]) -> EnrichedRecord {
        let rec = Record {
            id: s!("1001"),
            name: s!("JOAO DA SILVA"),
            wing: s!("ALA 1"),
            cell: s!("12"),
            photo_url: s!(),
        };
        let cad: DetailFields = extra.iter().map(|(k, v)| (s!(*k), s!(*v))).collect();
        EnrichedRecord::merge(&rec, &cad, &DetailFields::default())
    }

    #[test]
    fn wrap_is_greedy_and_fits() {
        let text = "rua das flores numero dez bairro centro cidade de boa vista";
        let width = 80.0;
        let lines = wrap_text(text, FontStyle::Regular, 11.0, width);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
        for l in &lines {
            assert!(text_width(l, FontStyle::Regular, 11.0) <= width, "{l:?} overflows");
        }
        // greedy: the next word never fit on the previous line
        for pair in lines.windows(2) {
            let first_next = pair[1].split(' ').next().unwrap();
            let grown = join!(&pair[0], " ", first_next);
            assert!(text_width(&grown, FontStyle::Regular, 11.0) > width);
        }
    }

    #[test]
    fn overlong_word_gets_own_line() {
        let lines = wrap_text("a SUPERCALIFRAGILISTIC b", FontStyle::Regular, 11.0, 20.0);
        assert_eq!(lines, vec!["a", "SUPERCALIFRAGILISTIC", "b"]);
        assert!(wrap_text("   ", FontStyle::Regular, 11.0, 20.0).is_empty());
    }

    #[test]
    fn fit_keeps_aspect_both_ways() {
        let (w, h) = fit_box(100.0, 200.0, 70.0, 90.0);
        assert!((w - 45.0).abs() < 1e-4 && (h - 90.0).abs() < 1e-4);
        let (w, h) = fit_box(1000.0, 500.0, 70.0, 90.0);
        assert!((w - 70.0).abs() < 1e-4 && (h - 35.0).abs() < 1e-4);
        assert_eq!(fit_box(0.0, 10.0, 70.0, 90.0), (0.0, 0.0));
    }

    #[test]
    fn header_and_non_empty_fields_only() {
        let page = layout_page(&record(&[("mother", "MARIA"), ("father", "  "), ("eyes", "castanhos")]), None);
        let texts: Vec<&str> = page.texts().collect();
        assert_eq!(texts[0], "JOAO DA SILVA");
        assert_eq!(texts[1], "ID: 1001   |   Wing: ALA 1   |   Cell: 12");
        assert!(texts.contains(&"Mother:"));
        assert!(texts.contains(&"MARIA"));
        assert!(texts.contains(&"Eyes:"));
        assert!(!texts.contains(&"Father:"));
        assert!(texts.contains(&"Personal data") && texts.contains(&"Features"));
        assert!(page.photo_rect().is_none());
    }

    #[test]
    fn photo_sits_in_its_box() {
        let page = layout_page(&record(&[]), Some((300, 400)));
        let (x, _y, w, h) = page.photo_rect().unwrap();
        assert_eq!(x, MARGIN);
        assert!(w <= PHOTO_BOX_W + 1e-3 && h <= PHOTO_BOX_H + 1e-3);
        assert!((w / h - 0.75).abs() < 1e-3);
    }
}
