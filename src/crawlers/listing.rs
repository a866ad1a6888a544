use std::collections::HashSet;

use super::{PageFetcher, Pipeline};
use crate::classifier::LinkCategory;
use crate::error::FetchError;
use crate::parsers::scan_page;
use crate::results::{LinkSet, ListingStop};

/// Result of walking the paginated sale index
#[derive(Debug)]
pub struct ListingResult {
    pub sales: LinkSet,
    /// Listing pages actually fetched
    pub pages: usize,
    pub stop: ListingStop,
}

impl<F: PageFetcher> Pipeline<F> {
    /// Follows "next" links from the index root, collecting sale links
    ///
    /// Stops at the end of the listing, on a repeated page, at the page cap or
    /// (under the isolate policy) on a page that cannot be fetched.
    pub async fn traverse_listing(&mut self) -> Result<ListingResult, FetchError> {
        let mut sales = LinkSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut cursor = Some(self.start_url.clone());
        let mut pages = 0;

        let stop = loop {
            let Some(url) = cursor.take() else {
                break ListingStop::EndOfListing;
            };
            if pages >= self.max_pages {
                ::log::info!("Listing page cap ({}) reached before {}", self.max_pages, url);
                break ListingStop::PageCap;
            }
            if !visited.insert(url.clone()) {
                ::log::info!("Listing loops back to {}, stopping", url);
                break ListingStop::Cycle;
            }

            let Some(html) = self.fetch_page(&url).await? else {
                break ListingStop::FetchFailed;
            };
            pages += 1;

            let page = scan_page(&html, &url, LinkCategory::Sale, &self.classifier, true);
            let before = sales.len();
            sales.extend(page.links);
            ::log::info!(
                "Listing page {} ({}): {} new sales",
                pages,
                url,
                sales.len() - before
            );

            cursor = page.next;
        };

        Ok(ListingResult { sales, pages, stop })
    }
}
