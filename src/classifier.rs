use regex::Regex;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use url::{Position, Url};

use crate::parsers::html::{anchors, collapsed_text};

/// What a discovered hyperlink points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCategory {
    /// A single sale page
    Sale,
    /// A single lot page
    Lot,
    /// A listing page further down the pagination
    PaginationNext,
    /// Anything else
    Irrelevant,
}

/// Regex patterns driving link classification
///
/// Patterns are matched against the path, query and fragment of a resolved URL
/// (or the raw href when it cannot be resolved).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkPatterns {
    /// Shape of a single sale page
    #[serde(default = "default_sale_pattern")]
    pub sale: String,

    /// Shape of the sale index; excluded from sale links
    #[serde(default = "default_sale_index_pattern")]
    pub sale_index: String,

    /// Shape of a single lot page
    #[serde(default = "default_lot_pattern")]
    pub lot: String,

    /// Query/path shape of a numbered listing page
    #[serde(default = "default_pagination_pattern")]
    pub pagination: String,

    /// Anchor text or aria-label meaning "next page"
    #[serde(default = "default_next_text_pattern")]
    pub next_text: String,
}

fn default_sale_pattern() -> String {
    r"(?i)/vente(/|s/|s\?|[?#]|$)".to_string()
}

// The index path is a textual prefix of the single-sale shape above.
fn default_sale_index_pattern() -> String {
    r"(?i)/ventes(/|\?|$)".to_string()
}

fn default_lot_pattern() -> String {
    r"(?i)/lot(/|s/|[?#]|$)|/detail/lot".to_string()
}

fn default_pagination_pattern() -> String {
    r"(?i)[?&](page|p)=\d+|/page/\d+".to_string()
}

fn default_next_text_pattern() -> String {
    r"(?i)\b(suivant|suivante|next)\b".to_string()
}

impl Default for LinkPatterns {
    fn default() -> Self {
        Self {
            sale: default_sale_pattern(),
            sale_index: default_sale_index_pattern(),
            lot: default_lot_pattern(),
            pagination: default_pagination_pattern(),
            next_text: default_next_text_pattern(),
        }
    }
}

/// Heuristic classifier for hyperlinks found on the auction site
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    sale: Regex,
    sale_index: Regex,
    lot: Regex,
    pagination: Regex,
    next_text: Regex,
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new(&LinkPatterns::default()).expect("built-in link patterns should be valid")
    }
}

impl LinkClassifier {
    /// Compile a classifier from its patterns
    pub fn new(patterns: &LinkPatterns) -> Result<Self, regex::Error> {
        Ok(Self {
            sale: Regex::new(&patterns.sale)?,
            sale_index: Regex::new(&patterns.sale_index)?,
            lot: Regex::new(&patterns.lot)?,
            pagination: Regex::new(&patterns.pagination)?,
            next_text: Regex::new(&patterns.next_text)?,
        })
    }

    /// Categorize `candidate` as found on `referrer`
    ///
    /// A lot nested under a sale path (`/vente/5/lot/3`) is a lot.
    pub fn classify(&self, candidate: &str, referrer: &str) -> LinkCategory {
        let resolved = resolve(candidate, referrer);
        let target = match_target(&resolved);

        [LinkCategory::Lot, LinkCategory::Sale, LinkCategory::PaginationNext]
            .into_iter()
            .find(|category| self.is(*category, target))
            .unwrap_or(LinkCategory::Irrelevant)
    }

    fn is(&self, category: LinkCategory, target: &str) -> bool {
        match category {
            LinkCategory::Sale => self.sale.is_match(target) && !self.sale_index.is_match(target),
            LinkCategory::Lot => self.lot.is_match(target),
            LinkCategory::PaginationNext => self.pagination.is_match(target),
            LinkCategory::Irrelevant => false,
        }
    }

    /// Resolved, fragment-free URLs of every anchor on the page that has the
    /// shape of `category`
    ///
    /// Each category is tested on its own, so a link can be both a sale and a
    /// lot. Duplicates are kept; callers dedup through their link set.
    pub fn links_in(&self, doc: &Html, page_url: &str, category: LinkCategory) -> Vec<String> {
        anchors(doc)
            .filter_map(|a| href_of(&a))
            .map(|href| resolve(href, page_url))
            .filter(|url| self.is(category, match_target(url)))
            .collect()
    }

    /// The one "next page" link of a listing page, if any
    ///
    /// Marked anchors win over guesses from URL shape; within a tier the first
    /// anchor in document order wins.
    pub fn next_page(&self, doc: &Html, page_url: &str) -> Option<String> {
        for tier in NextTier::ALL {
            let found = anchors(doc)
                .filter(|a| self.matches_tier(tier, a))
                .find_map(|a| href_of(&a));
            if let Some(href) = found {
                ::log::trace!("Next link on {} found by {:?}: {}", page_url, tier, href);
                return Some(resolve(href, page_url));
            }
        }

        let guess = anchors(doc)
            .filter_map(|a| href_of(&a))
            .map(|href| resolve(href, page_url))
            .find(|url| self.is(LinkCategory::PaginationNext, match_target(url)));
        if let Some(url) = &guess {
            ::log::trace!("Next link on {} guessed from URL shape: {}", page_url, url);
        }
        guess
    }

    fn matches_tier(&self, tier: NextTier, a: &ElementRef) -> bool {
        match tier {
            NextTier::Rel => is_rel_next(a),
            NextTier::Marked => is_next_by_class(a) || self.is_next_by_label(a),
            NextTier::Text => self.next_text.is_match(&collapsed_text(a)),
        }
    }

    fn is_next_by_label(&self, a: &ElementRef) -> bool {
        a.value()
            .attr("aria-label")
            .is_some_and(|label| self.next_text.is_match(label))
    }
}

/// Ways an anchor can announce itself as the next page, strongest first
#[derive(Debug, Clone, Copy)]
enum NextTier {
    Rel,
    Marked,
    Text,
}

impl NextTier {
    const ALL: [NextTier; 3] = [NextTier::Rel, NextTier::Marked, NextTier::Text];
}

fn href_of<'a>(a: &ElementRef<'a>) -> Option<&'a str> {
    a.value().attr("href").filter(|href| !href.trim().is_empty())
}

fn is_rel_next(a: &ElementRef) -> bool {
    a.value()
        .attr("rel")
        .is_some_and(|rel| rel.split_whitespace().any(|t| t.eq_ignore_ascii_case("next")))
}

fn is_next_by_class(a: &ElementRef) -> bool {
    if a.value().classes().any(|c| c == "next") {
        return true;
    }
    a.ancestors().filter_map(ElementRef::wrap).any(|parent| {
        parent.value().name() == "li" && parent.value().classes().any(|c| c == "pagination-next")
    })
}

/// Resolve `href` against `base`, dropping any fragment
///
/// Falls back to the raw href (minus fragment) when either side cannot be parsed.
pub fn resolve(href: &str, base: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(href.trim())) {
        Ok(url) => normalize_url(&url).to_string(),
        Err(_) => {
            ::log::trace!("Could not resolve {:?} against {}", href, base);
            strip_fragment(href).to_string()
        }
    }
}

/// Create a normalized version of the URL (fragment removed)
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}

fn strip_fragment(raw: &str) -> &str {
    raw.split('#').next().unwrap_or(raw)
}

// Path onward for absolute URLs, the whole string otherwise.
fn match_target(resolved: &str) -> &str {
    match Url::parse(resolved) {
        Ok(url) => {
            let start = url[..Position::BeforePath].len();
            resolved.get(start..).unwrap_or(resolved)
        }
        Err(_) => resolved,
    }
}
