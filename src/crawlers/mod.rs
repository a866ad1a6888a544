//! The crawl pipeline: listing pages → sale pages → lot pages.
//!
//! Every fetch goes through [`Pipeline::fetch_page`], which spaces requests
//! with the rate limiter, bounds each one by the fetch timeout and applies the
//! failure policy. Fetches are strictly
//! sequential.

pub mod fetcher;
pub mod listing;
pub mod lots;
pub mod sales;


use std::time::Duration;

use crate::classifier::LinkClassifier;
use crate::config::{FailurePolicy, RunConfig};
use crate::error::{ConfigError, FetchError};
use crate::limiter::RateLimiter;
use crate::parsers::lot::{KeywordFilter, LotParser};
use crate::results::RunOutcome;

pub use fetcher::{PageFetcher, WebDriverFetcher, fetch_within};

/// Owns the state of one run and drives the three crawl stages
pub struct Pipeline<F: PageFetcher> {
    fetcher: F,
    limiter: RateLimiter,
    fetch_timeout: Duration,
    classifier: LinkClassifier,
    lot_parser: LotParser,
    start_url: String,
    max_pages: usize,
    max_sale_pages: usize,
    policy: FailurePolicy,
    failures: Vec<FetchError>,
}

impl<F: PageFetcher> Pipeline<F> {
    /// Builds a pipeline from the run configuration
    pub fn new(config: &RunConfig, fetcher: F) -> Result<Self, ConfigError> {
        config.validate()?;

        let classifier =
            LinkClassifier::new(&config.links).map_err(|source| ConfigError::Pattern {
                name: "links",
                source,
            })?;
        let keywords =
            KeywordFilter::new(&config.keywords).map_err(|source| ConfigError::Pattern {
                name: "keywords",
                source,
            })?;

        Ok(Self {
            fetcher,
            limiter: RateLimiter::new(config.delay()),
            fetch_timeout: config.fetch_timeout(),
            classifier,
            lot_parser: LotParser::new(keywords),
            start_url: config.start_url()?,
            max_pages: config.max_pages,
            max_sale_pages: config.max_sale_pages,
            policy: config.failure_policy,
            failures: Vec::new(),
        })
    }

    /// Replace the rate limiter (e.g. to disable spacing in tests)
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn into_fetcher(self) -> F {
        self.fetcher
    }

    /// Runs listing traversal, sale expansion and lot extraction in turn
    pub async fn run(&mut self) -> Result<RunOutcome, FetchError> {
        let start_time = std::time::Instant::now();
        ::log::info!("Starting crawl at {}", self.start_url);

        let listing = self.traverse_listing().await?;
        ::log::info!(
            "Listing done: {} sales over {} pages ({:?})",
            listing.sales.len(),
            listing.pages,
            listing.stop
        );

        let lots = self.expand_sales(&listing.sales).await?;
        ::log::info!("Sale expansion done: {} lots", lots.len());

        let kept = self.extract_lots(&lots).await?;
        ::log::info!(
            "Extraction done: kept {} of {} lots in {:.2} seconds",
            kept.len(),
            lots.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(RunOutcome {
            sales: listing.sales,
            lots,
            kept,
            listing_pages: listing.pages,
            listing_stop: Some(listing.stop),
            failures: std::mem::take(&mut self.failures),
        })
    }

    /// Fetches one page behind the rate limiter, within the fetch timeout
    ///
    /// `Ok(None)` means the fetch failed and was skipped under the isolate policy.
    pub(crate) async fn fetch_page(&mut self, url: &str) -> Result<Option<String>, FetchError> {
        self.limiter.acquire().await;
        let result = fetch_within(&self.fetcher, url, self.fetch_timeout).await;
        self.limiter.mark();

        match result {
            Ok(html) => Ok(Some(html)),
            Err(e) => match self.policy {
                FailurePolicy::Strict => {
                    ::log::error!("Fetch failed, aborting run: {}", e);
                    Err(e)
                }
                FailurePolicy::Isolate => {
                    ::log::warn!("Skipping {}: {}", url, e);
                    self.failures.push(e);
                    Ok(None)
                }
            },
        }
    }
}
