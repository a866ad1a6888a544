use scraper::{ElementRef, Html, Selector};

/// Parses a rendered page; html5ever recovers from malformed markup
pub fn parse(html: &str) -> Html {
    Html::parse_document(html)
}

/// Every `<a>` element of the document, in document order
pub fn anchors(doc: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
}

/// Text content of an element with leading and trailing whitespace removed
pub fn trimmed_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text content of an element with runs of whitespace collapsed to one space
pub fn collapsed_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiles a CSS selector, logging and skipping invalid ones
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            ::log::warn!("Ignoring invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}
