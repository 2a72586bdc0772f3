// src/specs/details.rs
//
// Per-inmate biographical pages. Two pages, one fixed selector per field.

use scraper::Html;

use crate::config::options::PortalOptions;
use crate::core::html::select_text;
use crate::core::net::{CallSite, Session, Transport};
use crate::error::Result;
use crate::progress::Progress;

use super::roster::Record;

/// (key, CSS selector) pairs for the registration page.
pub const CADASTRAL_FIELDS: &[(&str, &str)] = &[
    ("mother", "tr:nth-child(3) .titulobk"),
    ("father", "tr:nth-child(4) .titulobk"),
    ("birth_date", "tr:nth-child(5) .titulobk~ .titulobk"),
    ("document", "tr:nth-child(13) .titulobk~ .titulobk"),
    ("origin_city", "tr:nth-child(8) .titulobk"),
    ("origin_state", "tr:nth-child(9) .titulobk"),
    ("address", "tr:nth-child(24) .titulobk"),
];

/// (key, CSS selector) pairs for the physical description page.
pub const DESCRIPTIVE_FIELDS: &[(&str, &str)] = &[
    ("ethnicity", "tr:nth-child(16) .titulobk:nth-child(2)"),
    ("face", "tr:nth-child(17) td.titulobk"),
    ("eyes", "tr:nth-child(18) td.titulobk"),
    ("nose", "tr:nth-child(19) td.titulobk"),
    ("mouth", ".titulobk~ .titulo12bk+ .titulobk"),
    ("teeth", "tr:nth-child(17) .tituloVerde .titulobk"),
    ("hair", "tr:nth-child(18) .tituloVerde .titulobk"),
    ("height", "tr:nth-child(19) .tituloVerde .titulobk"),
    ("marks", "tr:nth-child(22) .titulobk"),
];

/// Ordered key/value pairs. Every configured key is present, possibly "".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailFields(Vec<(String, String)>);

impl DetailFields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for DetailFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Extract every field; a bad or unmatched selector gives "".
pub fn parse_detail(html: &str, fields: &[(&str, &str)]) -> DetailFields {
    let doc = Html::parse_document(html);
    fields
        .iter()
        .map(|(key, css)| (s!(*key), select_text(&doc, css)))
        .collect()
}

/// Fetch both pages for `id`. Page-level HTTP errors propagate.
pub fn fetch_details<T: Transport>(
    session: &mut Session<T>,
    opts: &PortalOptions,
    id: &str,
    progress: &mut dyn Progress,
) -> Result<(DetailFields, DetailFields)> {
    let cad = session.get(&opts.cadastral_url(id), CallSite::Detail, progress)?;
    let cadastral = parse_detail(&cad.text(), CADASTRAL_FIELDS);

    let desc = session.get(&opts.descriptive_url(id), CallSite::Detail, progress)?;
    let descriptive = parse_detail(&desc.text(), DESCRIPTIVE_FIELDS);

    Ok((cadastral, descriptive))
}

/// Roster entry overlaid with both detail pages; later layers win.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnrichedRecord {
    fields: Vec<(String, String)>,
}

impl EnrichedRecord {
    pub fn merge(record: &Record, cadastral: &DetailFields, descriptive: &DetailFields) -> Self {
        let mut out = Self::default();
        for (k, v) in record.to_fields() {
            out.set(k, &v);
        }
        for (k, v) in cadastral.iter().chain(descriptive.iter()) {
            out.set(k, v);
        }
        out
    }

    /// Value for `key`, or "" when unknown.
    pub fn get(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = s!(value),
            None => self.fields.push((s!(key), s!(value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(cells: &[(usize, &str)]) -> String {
        let mut html = s!("<table>");
        for n in 1..=25 {
            let body = cells
                .iter()
                .find(|(i, _)| *i == n)
                .map(|(_, v)| *v)
                .unwrap_or("");
            html.push_str(&format!("<tr><td>label</td>{body}</tr>"));
        }
        html.push_str("</table>");
        html
    }

    #[test]
    fn cadastral_page_fields() {
        let html = rows(&[
            (3, r#"<td class="titulobk"> MARIA   DA SILVA </td>"#),
            (5, r#"<td class="titulobk">x</td><td class="titulobk">01/02/1990</td>"#),
            (9, r#"<td class="titulobk">RR</td>"#),
        ]);
        let f = parse_detail(&html, CADASTRAL_FIELDS);
        assert_eq!(f.len(), CADASTRAL_FIELDS.len());
        assert_eq!(f.get("mother"), Some("MARIA DA SILVA"));
        assert_eq!(f.get("birth_date"), Some("01/02/1990"));
        assert_eq!(f.get("origin_state"), Some("RR"));
        assert_eq!(f.get("father"), Some(""));
        assert_eq!(f.get("address"), Some(""));
    }

    #[test]
    fn broken_selector_only_blanks_its_field() {
        let html = rows(&[(3, r#"<td class="titulobk">M</td>"#)]);
        let f = parse_detail(&html, &[("mother", "tr:nth-child(3) .titulobk"), ("bad", "tr:::(")]);
        assert_eq!(f.get("mother"), Some("M"));
        assert_eq!(f.get("bad"), Some(""));
    }

    #[test]
    fn merge_is_right_biased() {
        let rec = Record { id: s!("1"), name: s!("ROSTER NAME"), wing: s!("A"), ..Record::default() };
        let cad: DetailFields =
            [(s!("name"), s!("CAD NAME")), (s!("mother"), s!("M"))].into_iter().collect();
        let desc: DetailFields =
            [(s!("mother"), s!("DESC M")), (s!("eyes"), s!("brown"))].into_iter().collect();

        let e = EnrichedRecord::merge(&rec, &cad, &desc);
        assert_eq!(e.get("id"), "1");
        assert_eq!(e.get("wing"), "A");
        assert_eq!(e.get("name"), "CAD NAME");
        assert_eq!(e.get("mother"), "DESC M");
        assert_eq!(e.get("eyes"), "brown");
        assert_eq!(e.get("nope"), "");
    }
}
