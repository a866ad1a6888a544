//! Ordered fallback strategies for pulling one field out of a page.
//!
//! A [`StrategyChain`] tries each [`Strategy`] in turn; the first one that
//! yields a non-empty value wins.

use scraper::{Html, Selector};

use super::html::{selector, trimmed_text};

/// One way of extracting a field
#[derive(Debug, Clone)]
pub enum Strategy {
    /// First matching element with non-empty trimmed text
    Text(Selector),
    /// First matching element whose trimmed text is longer than `min_chars`
    LongText { selector: Selector, min_chars: usize },
    /// First matching element carrying one of `attrs` (tried in order)
    Attr {
        selector: Selector,
        attrs: &'static [&'static str],
    },
}

impl Strategy {
    pub fn text(css: &str) -> Option<Self> {
        selector(css).map(Strategy::Text)
    }

    pub fn long_text(css: &str, min_chars: usize) -> Option<Self> {
        selector(css).map(|selector| Strategy::LongText {
            selector,
            min_chars,
        })
    }

    pub fn attr(css: &str, attrs: &'static [&'static str]) -> Option<Self> {
        selector(css).map(|selector| Strategy::Attr { selector, attrs })
    }

    /// Runs this strategy alone
    pub fn apply(&self, doc: &Html) -> Option<String> {
        match self {
            Strategy::Text(sel) => doc
                .select(sel)
                .map(|el| trimmed_text(&el))
                .find(|text| !text.is_empty()),
            Strategy::LongText {
                selector,
                min_chars,
            } => doc
                .select(selector)
                .map(|el| trimmed_text(&el))
                .find(|text| text.chars().count() > *min_chars),
            Strategy::Attr { selector, attrs } => doc.select(selector).find_map(|el| {
                attrs
                    .iter()
                    .filter_map(|name| el.value().attr(name))
                    .map(str::trim)
                    .find(|value| !value.is_empty())
                    .map(str::to_string)
            }),
        }
    }
}

/// Named, ordered list of strategies for a single field
#[derive(Debug, Clone)]
pub struct StrategyChain {
    field: &'static str,
    strategies: Vec<Strategy>,
}

impl StrategyChain {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    /// Appends a strategy; invalid selectors were already logged and are skipped
    pub fn then(mut self, strategy: Option<Strategy>) -> Self {
        self.strategies.extend(strategy);
        self
    }

    /// Appends a [`Strategy::Text`] for each selector, in order
    pub fn then_texts(self, selectors: &[&str]) -> Self {
        selectors
            .iter()
            .fold(self, |chain, css| chain.then(Strategy::text(css)))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Value from the first strategy that produces one
    pub fn first_match(&self, doc: &Html) -> Option<String> {
        self.strategies.iter().enumerate().find_map(|(i, s)| {
            let found = s.apply(doc);
            if found.is_some() {
                ::log::trace!("{} taken from strategy #{}", self.field, i);
            }
            found
        })
    }
}
