// tests/render_pdf.rs

use std::collections::HashMap;
use std::io::Cursor;

use cara_cracha::render::photo::{NoPhotos, PhotoSource};
use cara_cracha::render::render_document;
use cara_cracha::specs::details::{DetailFields, EnrichedRecord};
use cara_cracha::specs::roster::Record;

struct Photos(HashMap<String, Vec<u8>>);

impl PhotoSource for Photos {
    fn photo(&mut self, url: &str) -> Option<Vec<u8>> {
        self.0.get(url).cloned()
    }
}

fn record(id: &str, name: &str, photo_url: &str) -> EnrichedRecord {
    let rec = Record {
        id: id.into(),
        name: name.into(),
        wing: "ALA 1".into(),
        cell: "3".into(),
        photo_url: photo_url.into(),
    };
    let cad: DetailFields = [
        ("mother".to_string(), "MARIA DAS GRAÇAS".to_string()),
        ("address".to_string(), "RUA DAS ACÁCIAS, 120, BAIRRO CENTRO, BOA VISTA - RR, PRÓXIMO AO MERCADO".to_string()),
    ]
    .into_iter()
    .collect();
    EnrichedRecord::merge(&rec, &cad, &DetailFields::default())
}

fn jpeg(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([90, 90, 90]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

#[test]
fn one_page_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.pdf");
    let records = vec![record("1", "JOÃO", "https://x/1.jpg"), record("2", "PEDRO", "")];
    let mut photos = Photos(HashMap::from([(String::from("https://x/1.jpg"), jpeg(60, 80))]));

    let pages = render_document(&records, &mut photos, &path).unwrap();

    assert_eq!(pages, 2);
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 1_000);
}

#[test]
fn broken_photo_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.pdf");
    let mut photos = Photos(HashMap::from([(String::from("https://x/1.jpg"), b"<html>".to_vec())]));

    let pages = render_document(&[record("1", "JOAO", "https://x/1.jpg")], &mut photos, &path).unwrap();
    assert_eq!(pages, 1);
    assert!(path.exists());
}

#[test]
fn zero_records_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.pdf");
    assert_eq!(render_document(&[], &mut NoPhotos, &path).unwrap(), 0);
    assert!(!path.exists());
}

#[test]
fn unwritable_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("x.pdf");
    assert!(render_document(&[record("1", "N", "")], &mut NoPhotos, &path).is_err());
}
