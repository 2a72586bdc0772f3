// src/render/pdf.rs
//
// printpdf backend: executes `PageLayout` ops, nothing else.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerIndex, PdfPageIndex, Px,
};

use crate::error::{Result, ScrapeError};

use super::layout::{DrawOp, PAGE_H, PAGE_W, PageLayout};
use super::metrics::{FontStyle, printable};
use super::photo::DecodedPhoto;

const LAYER: &str = "Layer 1";

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn render_err(e: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Render(e.to_string())
}

/// A4 document under construction. The first page comes with the document,
/// so it is held back until the first `push_page`.
pub struct PdfSheet {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    first: Option<(PdfPageIndex, PdfLayerIndex)>,
    pages: usize,
}

impl PdfSheet {
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, mm(PAGE_W), mm(PAGE_H), LAYER);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_err)?;
        Ok(Self { doc, regular, bold, first: Some((page, layer)), pages: 0 })
    }

    pub fn push_page(&mut self, layout: &PageLayout, photo: Option<&DecodedPhoto>) {
        let (page, layer) = match self.first.take() {
            Some(first) => first,
            None => self.doc.add_page(mm(PAGE_W), mm(PAGE_H), LAYER),
        };
        let layer = self.doc.get_page(page).get_layer(layer);

        for op in &layout.ops {
            match op {
                DrawOp::Text { x, y, size, style, text } => {
                    let font = match style {
                        FontStyle::Regular => &self.regular,
                        FontStyle::Bold => &self.bold,
                    };
                    layer.use_text(printable(text), *size, mm(*x), mm(*y), font);
                }
                DrawOp::Photo { x, y, w, h } => {
                    let Some(p) = photo else { continue };
                    if p.width == 0 || p.height == 0 {
                        continue;
                    }
                    let xobj = ImageXObject {
                        width: Px(p.width as usize),
                        height: Px(p.height as usize),
                        color_space: ColorSpace::Rgb,
                        bits_per_component: ColorBits::Bit8,
                        interpolate: true,
                        image_data: p.rgb.clone(),
                        image_filter: None,
                        smask: None,
                        clipping_bbox: None,
                    };
                    // at 72 dpi one pixel is one point
                    Image::from(xobj).add_to_layer(
                        layer.clone(),
                        ImageTransform {
                            translate_x: Some(mm(*x)),
                            translate_y: Some(mm(*y)),
                            scale_x: Some(*w / p.width as f32),
                            scale_y: Some(*h / p.height as f32),
                            dpi: Some(72.0),
                            ..Default::default()
                        },
                    );
                }
            }
        }
        self.pages += 1;
    }

    /// Write to `path`; returns the page count.
    pub fn save(self, path: &Path) -> Result<usize> {
        let pages = self.pages;
        let mut out = BufWriter::new(File::create(path)?);
        self.doc.save(&mut out).map_err(render_err)?;
        Ok(pages)
    }
}
