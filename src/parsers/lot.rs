use regex::{Regex, RegexBuilder};
use scraper::Html;

use super::extract::{Strategy, StrategyChain};
use crate::classifier::resolve;
use crate::results::LotRecord;

/// Title used when a lot page has no usable heading or `<title>`
pub const TITLE_PLACEHOLDER: &str = "(sans titre)";

/// Paragraphs at or under this many characters are treated as boilerplate
pub const MIN_PARAGRAPH_CHARS: usize = 60;

const TITLE_SELECTORS: &[&str] = &["h1", "h2", ".product-title", ".lot-title", ".page-title"];

const DESCRIPTION_SELECTORS: &[&str] = &[
    ".product.attribute.description",
    ".lot-description",
    ".product-description",
    ".description",
    "#description",
];

const IMAGE_SELECTORS: &[&str] = &[
    "img.product-image-photo",
    ".gallery img",
    "figure img",
    "img[src*='/media/']",
];

const IMAGE_ATTRS: &[&str] = &["src", "data-src"];

/// Case-insensitive keyword predicate deciding which lots are kept
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    pattern: Regex,
}

impl KeywordFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { pattern })
    }

    pub fn matches(&self, title: &str, description: &str) -> bool {
        self.pattern.is_match(&format!("{title}\n{description}"))
    }
}

/// Turns a rendered lot page into a [`LotRecord`]
#[derive(Debug, Clone)]
pub struct LotParser {
    title: StrategyChain,
    description: StrategyChain,
    image: StrategyChain,
    keywords: KeywordFilter,
}

impl LotParser {
    pub fn new(keywords: KeywordFilter) -> Self {
        let title = StrategyChain::new("title")
            .then_texts(TITLE_SELECTORS)
            .then(Strategy::text("title"));

        let description = StrategyChain::new("description")
            .then_texts(DESCRIPTION_SELECTORS)
            .then(Strategy::long_text("p", MIN_PARAGRAPH_CHARS));

        let image = IMAGE_SELECTORS.iter().fold(StrategyChain::new("image"), |chain, css| {
            chain.then(Strategy::attr(css, IMAGE_ATTRS))
        });

        Self {
            title,
            description,
            image,
            keywords,
        }
    }

    pub fn parse(&self, html: &str, lot_url: &str) -> LotRecord {
        let doc = Html::parse_document(html);

        let title = self.title.first_match(&doc).unwrap_or_default();
        let description = self.description.first_match(&doc).unwrap_or_default();
        let image = self
            .image
            .first_match(&doc)
            .map(|src| resolve(&src, lot_url))
            .unwrap_or_default();
        let keep = self.keywords.matches(&title, &description);

        LotRecord {
            url: lot_url.to_string(),
            title: if title.is_empty() {
                TITLE_PLACEHOLDER.to_string()
            } else {
                title
            },
            description,
            image,
            keep,
        }
    }
}
