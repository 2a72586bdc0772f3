// src/render/photo.rs

use crate::core::net::{Session, Transport};

/// Where photo bytes come from. The live session in production, a map in tests.
pub trait PhotoSource {
    /// `None` for any failure; a missing photo never stops a page.
    fn photo(&mut self, url: &str) -> Option<Vec<u8>>;
}

impl<T: Transport> PhotoSource for Session<T> {
    fn photo(&mut self, url: &str) -> Option<Vec<u8>> {
        if url.trim().is_empty() {
            return None;
        }
        self.fetch_bytes(url)
    }
}

/// No photos at all.
pub struct NoPhotos;

impl PhotoSource for NoPhotos {
    fn photo(&mut self, _url: &str) -> Option<Vec<u8>> {
        None
    }
}

/// 8-bit RGB pixels, row-major.
#[derive(Clone, Debug)]
pub struct DecodedPhoto {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Decode JPEG/PNG bytes; alpha is dropped.
pub fn decode(bytes: &[u8]) -> Option<DecodedPhoto> {
    match image::load_from_memory(bytes) {
        Ok(img) => {
            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            Some(DecodedPhoto { width, height, rgb: rgb.into_raw() })
        }
        Err(e) => {
            logd!("Photo decode failed: {e}");
            None
        }
    }
}

pub fn load(source: &mut dyn PhotoSource, url: &str) -> Option<DecodedPhoto> {
    source.photo(url).and_then(|bytes| decode(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgb() {
        let p = decode(&png(3, 2)).unwrap();
        assert_eq!((p.width, p.height), (3, 2));
        assert_eq!(p.rgb.len(), 3 * 2 * 3);
        assert_eq!(&p.rgb[..3], &[10, 20, 30]);
    }

    #[test]
    fn garbage_is_no_photo() {
        assert!(decode(b"<html>not an image</html>").is_none());
        assert!(load(&mut NoPhotos, "https://x/1.jpg").is_none());
    }
}
