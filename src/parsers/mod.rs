pub mod extract;
pub mod html;
pub mod lot;

#[cfg(test)]
mod tests;

use crate::classifier::{LinkCategory, LinkClassifier};

/// Links of interest found on a listing or sale page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// Resolved links of the requested category, duplicates included
    pub links: Vec<String>,
    /// Where pagination continues, if anywhere
    pub next: Option<String>,
}

/// Parses a page once and collects the links of `category`
///
/// The next-page link is only looked up when `follow_next` is set.
pub fn scan_page(
    html: &str,
    page_url: &str,
    category: LinkCategory,
    classifier: &LinkClassifier,
    follow_next: bool,
) -> PageLinks {
    let doc = html::parse(html);
    let links = classifier.links_in(&doc, page_url, category);
    let next = if follow_next {
        classifier.next_page(&doc, page_url)
    } else {
        None
    };

    ::log::debug!(
        "Found {} {:?} links on {} (next: {:?})",
        links.len(),
        category,
        page_url,
        next
    );

    PageLinks { links, next }
}
