use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::FetchError;

/// Structured data extracted from one lot page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotRecord {
    /// URL of the lot page
    pub url: String,

    /// Heading of the lot, never empty
    pub title: String,

    /// Free-text description (may be empty)
    pub description: String,

    /// Absolute image URL (may be empty)
    pub image: String,

    /// Whether the keyword filter matched
    pub keep: bool,
}

/// Set of discovered URLs; iterates in discovery order
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `url`, returning false if it was already present
    pub fn insert(&mut self, url: String) -> bool {
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.order.push(url);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Membership without order, for comparisons
    pub fn as_set(&self) -> &HashSet<String> {
        &self.seen
    }
}

impl Extend<String> for LinkSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        for url in iter {
            self.insert(url);
        }
    }
}

/// Why the listing traversal stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStop {
    /// The last page had no next link
    EndOfListing,
    /// A next link pointed at an already visited page
    Cycle,
    /// The page cap was reached
    PageCap,
    /// A listing page could not be fetched and failures are isolated
    FetchFailed,
}

/// Everything a run produced
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub sales: LinkSet,
    pub lots: LinkSet,
    /// Kept records, in extraction order
    pub kept: Vec<LotRecord>,
    /// Listing pages fetched
    pub listing_pages: usize,
    pub listing_stop: Option<ListingStop>,
    /// Fetch failures skipped under the isolate policy
    pub failures: Vec<FetchError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_set_insert_dedups_in_discovery_order() {
        let mut set = LinkSet::new();
        assert!(set.insert("https://a.fr/lot/2".to_string()));
        assert!(set.insert("https://a.fr/lot/1".to_string()));
        assert!(!set.insert("https://a.fr/lot/2".to_string()));

        assert_eq!(set.len(), 2);
        assert!(set.contains("https://a.fr/lot/1"));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["https://a.fr/lot/2", "https://a.fr/lot/1"]
        );
    }
}
