use std::collections::HashSet;

use super::{PageFetcher, Pipeline};
use crate::classifier::LinkCategory;
use crate::error::FetchError;
use crate::parsers::scan_page;
use crate::results::LinkSet;

impl<F: PageFetcher> Pipeline<F> {
    /// Collects lot links from every sale page
    ///
    /// Each sale is scanned on its first page only unless `max_sale_pages`
    /// allows following its pagination.
    pub async fn expand_sales(&mut self, sales: &LinkSet) -> Result<LinkSet, FetchError> {
        let mut lots = LinkSet::new();

        for sale in sales.iter() {
            let mut visited: HashSet<String> = HashSet::new();
            let mut cursor = Some(sale.to_string());

            while let Some(url) = cursor.take() {
                if visited.len() >= self.max_sale_pages || !visited.insert(url.clone()) {
                    break;
                }
                let Some(html) = self.fetch_page(&url).await? else {
                    break;
                };

                let paginate = self.max_sale_pages > 1;
                let page = scan_page(&html, &url, LinkCategory::Lot, &self.classifier, paginate);
                let before = lots.len();
                lots.extend(page.links);
                ::log::debug!("Sale page {}: {} new lots", url, lots.len() - before);

                cursor = page.next;
            }
        }

        Ok(lots)
    }
}
