// src/core/html.rs
//
// Thin helpers over `scraper` shared by the page specs.
// All of them are total: a bad selector or a missing node yields "" / None, never an error.

use scraper::{ElementRef, Html, Selector};

use super::sanitize::normalize_ws;

/// Parse a CSS selector, logging (not failing) on bad input.
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            logw!("Bad selector {css:?}: {e}");
            None
        }
    }
}

/// Text nodes joined by newlines, split into trimmed non-empty lines.
pub fn text_lines(el: ElementRef<'_>) -> Vec<String> {
    let joined = el.text().collect::<Vec<_>>().join("\n");
    joined
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Text nodes joined by spaces with whitespace collapsed.
pub fn clean_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<Vec<_>>().join(" "))
}

/// Collapsed text of the first element matching `css`, or "".
pub fn select_text(doc: &Html, css: &str) -> String {
    selector(css)
        .and_then(|sel| doc.select(&sel).next().map(clean_text))
        .unwrap_or_default()
}

/// First attribute among `names` that is present and non-blank.
pub fn first_attr<'a>(el: ElementRef<'a>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|n| el.value().attr(n))
        .map(str::trim)
        .find(|v| !v.is_empty())
}

/// Case-insensitive `type` attribute, with "" when absent.
pub fn input_type(el: ElementRef<'_>) -> String {
    el.value().attr("type").unwrap_or_default().trim().to_ascii_lowercase()
}

/// `name` attribute when present and non-empty.
pub fn input_name<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.value().attr("name").filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_skip_blank_text_nodes() {
        let doc = Html::parse_fragment("<div> ID:1 <br>\n <b>  Name </b><br/><br/>x</div>");
        let sel = Selector::parse("div").unwrap();
        let div = doc.select(&sel).next().unwrap();
        assert_eq!(text_lines(div), vec!["ID:1", "Name", "x"]);
    }

    #[test]
    fn select_text_is_total() {
        let doc = Html::parse_document("<table><tr><td class='a'> x \n y </td></tr></table>");
        assert_eq!(select_text(&doc, "td.a"), "x y");
        assert_eq!(select_text(&doc, "td.missing"), "");
        assert_eq!(select_text(&doc, "td[[["), "");
    }
}
