// src/specs/roster.rs
//
// Roster page: one marker block per inmate, fixed line offsets, photo somewhere nearby.

use std::collections::BTreeSet;

use scraper::{ElementRef, Html};
use url::Url;

use crate::config::options::RosterRules;
use crate::core::html::{first_attr, selector, text_lines};
use crate::core::net::{CallSite, Session, Transport};
use crate::core::sanitize::{drop_label, is_absolute_http, split_last_slash};
use crate::error::Result;
use crate::progress::Progress;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub wing: String,
    pub cell: String,
    /// Absolute when the page gave a relative one; "" when no image was found
    pub photo_url: String,
}

impl Record {
    /// Key/value view used as the bottom layer of an enriched record.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.clone()),
            ("name", self.name.clone()),
            ("wing", self.wing.clone()),
            ("cell", self.cell.clone()),
            ("photo_url", self.photo_url.clone()),
        ]
    }

    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// GET the roster (TLS downgrade applies) and parse it. Relative photo links
/// are resolved against `url`.
pub fn fetch_roster<T: Transport>(
    session: &mut Session<T>,
    url: &str,
    rules: &RosterRules,
    progress: &mut dyn Progress,
) -> Result<Vec<Record>> {
    let resp = session.get(url, CallSite::Roster, progress)?;
    let records = parse_roster(&resp.text(), Some(url), rules);
    logf!("Roster: {} blocks at {url}", records.len());
    Ok(records)
}

/// Parse every marker block into a `Record`. Never fails: short blocks
/// give records with empty fields.
pub fn parse_roster(html: &str, base_url: Option<&str>, rules: &RosterRules) -> Vec<Record> {
    let doc = Html::parse_document(html);
    let Some(block_sel) = selector(&format!(".{}", rules.marker_class)) else {
        return Vec::new();
    };

    doc.select(&block_sel)
        .map(|block| parse_block(block, base_url, rules))
        .collect()
}

fn parse_block(block: ElementRef<'_>, base_url: Option<&str>, rules: &RosterRules) -> Record {
    let lines = text_lines(block);
    let mut rec = Record::default();

    if let Some(first) = lines.first() {
        rec.id = s!(drop_label(first, rules.id_prefix_len).trim());
    }
    if let Some(second) = lines.get(1) {
        rec.name = second.clone();
    }
    // lines 3 and 4 carry nothing we print
    if let Some(fifth) = lines.get(4) {
        let (wing, cell) = split_last_slash(&drop_label(fifth, rules.wing_prefix_len));
        rec.wing = wing;
        rec.cell = cell;
    }

    rec.photo_url = find_photo(block)
        .map(|raw| resolve(raw, base_url))
        .unwrap_or_default();
    rec
}

/// Search order: block, parent, nearest previous element sibling, nearest next one.
fn find_photo<'a>(block: ElementRef<'a>) -> Option<&'a str> {
    let parent = block.parent().and_then(ElementRef::wrap);
    let prev = block.prev_siblings().find_map(ElementRef::wrap);
    let next = block.next_siblings().find_map(ElementRef::wrap);

    let from_block = first_img_link(block, false);
    from_block
        .or_else(|| parent.and_then(|p| first_img_link(p, false)))
        .or_else(|| prev.and_then(|p| first_img_link(p, true)))
        .or_else(|| next.and_then(|n| first_img_link(n, true)))
}

/// First `<img>` under `el` (or `el` itself when `include_self`) carrying a
/// non-blank `src`, else `link`.
fn first_img_link<'a>(el: ElementRef<'a>, include_self: bool) -> Option<&'a str> {
    let img_sel = selector("img")?;
    let own = (include_self && el.value().name() == "img").then_some(el);
    own.into_iter()
        .chain(el.select(&img_sel))
        .find_map(|img| first_attr(img, &["src", "link"]))
}

fn resolve(raw: &str, base_url: Option<&str>) -> String {
    if is_absolute_http(raw) {
        return s!(raw);
    }
    let Some(base) = base_url else { return s!(raw) };
    match Url::parse(base).and_then(|b| b.join(raw)) {
        Ok(u) => u.to_string(),
        Err(e) => {
            logd!("Photo link {raw:?} kept as-is: {e}");
            s!(raw)
        }
    }
}

/// Distinct non-empty wings, sorted.
pub fn distinct_wings(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.wing.trim())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://portal.example/sgp/areas/impressoes/chamada.php";

    fn block(id: &str, name: &str, wing_line: &str, img: &str) -> String {
        format!(
            r#"<div class="titulobkSingCAPS">{img}<br>{id}<br>{name}<br>SITUACAO<br>REGIME<br>{wing_line}</div>"#
        )
    }

    #[test]
    fn offsets_and_relative_photo() {
        let html = block("ID:1001", "JOAO DA SILVA", "ALA: ALA 1/BLOCO B/12", r#"<img src="../fotos/1001.jpg">"#);
        let recs = parse_roster(&html, Some(BASE), &RosterRules::default());
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.id, "1001");
        assert_eq!(r.name, "JOAO DA SILVA");
        assert_eq!(r.wing, "ALA 1/BLOCO B");
        assert_eq!(r.cell, "12");
        assert_eq!(r.photo_url, "https://portal.example/sgp/areas/fotos/1001.jpg");
    }

    #[test]
    fn spaced_id_label_is_trimmed() {
        let html = block("ID: 1001", "JOAO", "ALA: A/1", "");
        let r = &parse_roster(&html, None, &RosterRules::default())[0];
        assert_eq!(r.id, "1001");
        assert!(r.has_id());
    }

    #[test]
    fn short_block_still_yields_a_record() {
        let html = r#"<span class="titulobkSingCAPS">ID:</span><span class="titulobkSingCAPS"></span>"#;
        let recs = parse_roster(html, None, &RosterRules::default());
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].id, "ID:");
        assert_eq!(recs[1], Record::default());
        assert!(!recs[1].has_id());
    }

    #[test]
    fn wing_without_slash_has_empty_cell() {
        let html = block("ID:7", "X", "ALA: TRIAGEM", "");
        let r = &parse_roster(&html, None, &RosterRules::default())[0];
        assert_eq!((r.wing.as_str(), r.cell.as_str()), ("TRIAGEM", ""));
        assert_eq!(r.photo_url, "");
    }

    #[test]
    fn photo_falls_back_to_link_attr_and_siblings() {
        let html = r#"
            <table><tr>
              <td><img link="/f/9.jpg"></td>
              <td><div><p class="titulobkSingCAPS">ID:9<br>NOME<br>a<br>b<br>ALA: C/1</p></div></td>
            </tr></table>"#;
        // image sits in a cousin cell: out of reach
        let r = &parse_roster(html, Some(BASE), &RosterRules::default())[0];
        assert_eq!(r.photo_url, "");

        let html = r#"<div><img link="/f/9.jpg"><p class="titulobkSingCAPS">ID:9</p></div>"#;
        let r = &parse_roster(html, Some(BASE), &RosterRules::default())[0];
        assert_eq!(r.photo_url, "https://portal.example/f/9.jpg");
    }

    #[test]
    fn absolute_photo_kept_verbatim() {
        let html = block("ID:1", "N", "ALA: A/1", r#"<img src="HTTP://cdn.example/1.jpg">"#);
        let r = &parse_roster(&html, Some(BASE), &RosterRules::default())[0];
        assert_eq!(r.photo_url, "HTTP://cdn.example/1.jpg");
    }

    #[test]
    fn custom_rules_are_honoured() {
        let rules = RosterRules { marker_class: s!("preso"), id_prefix_len: 0, wing_prefix_len: 0 };
        let html = r#"<div class="preso">42<br>N<br>-<br>-<br>B/3</div>"#;
        let r = &parse_roster(html, None, &rules)[0];
        assert_eq!((r.id.as_str(), r.wing.as_str(), r.cell.as_str()), ("42", "B", "3"));
    }

    #[test]
    fn wings_are_distinct_sorted_non_empty() {
        let mk = |w: &str| Record { wing: s!(w), ..Record::default() };
        let recs = vec![mk("B"), mk(""), mk("A"), mk("B"), mk("  ")];
        assert_eq!(distinct_wings(&recs), vec![s!("A"), s!("B")]);
    }
}
