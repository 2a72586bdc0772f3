// src/render/mod.rs
//! Badge sheet rendering: one A4 page per enriched record.
//!
//! `layout` is pure (record → draw ops) and carries all the geometry;
//! `pdf` only executes ops; `photo` fetches and decodes pictures best-effort.

pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod photo;

use std::path::Path;

use crate::error::Result;
use crate::specs::details::EnrichedRecord;

use self::layout::layout_page;
use self::pdf::PdfSheet;
use self::photo::PhotoSource;

const DOC_TITLE: &str = "Cara-Crachá";

/// Render `records` to `path`, returning the page count.
/// Zero records writes nothing and returns 0.
pub fn render_document(
    records: &[EnrichedRecord],
    photos: &mut dyn PhotoSource,
    path: &Path,
) -> Result<usize> {
    if records.is_empty() {
        logf!("Render: nothing to write, {} left untouched", path.display());
        return Ok(0);
    }

    let mut sheet = PdfSheet::new(DOC_TITLE)?;
    for rec in records {
        let photo = photo::load(photos, rec.get("photo_url"));
        let page = layout_page(rec, photo.as_ref().map(|p| (p.width, p.height)));
        sheet.push_page(&page, photo.as_ref());
    }

    let pages = sheet.save(path)?;
    logf!("Render: {pages} page(s) → {}", path.display());
    Ok(pages)
}
