use super::{PageFetcher, Pipeline};
use crate::error::FetchError;
use crate::results::{LinkSet, LotRecord};

impl<F: PageFetcher> Pipeline<F> {
    /// Fetches and parses every lot page, returning the records that passed the keyword filter
    pub async fn extract_lots(&mut self, lots: &LinkSet) -> Result<Vec<LotRecord>, FetchError> {
        let mut kept = Vec::new();

        for lot in lots.iter() {
            let Some(html) = self.fetch_page(lot).await? else {
                continue;
            };

            let record = self.lot_parser.parse(&html, lot);
            ::log::debug!(
                "Lot {}: {:?} (keep: {})",
                record.url,
                record.title,
                record.keep
            );
            if record.keep {
                kept.push(record);
            }
        }

        Ok(kept)
    }
}
