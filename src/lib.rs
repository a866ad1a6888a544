//! Crawls an auction site for lots matching a keyword and publishes them as a
//! static HTML page.

pub mod classifier;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod limiter;
pub mod parsers;
pub mod report;
pub mod results;

pub use classifier::{LinkCategory, LinkClassifier};
pub use config::{FailurePolicy, RunConfig};
pub use crawlers::{PageFetcher, Pipeline, WebDriverFetcher};
pub use error::{ConfigError, FetchError, RunError};
pub use results::{LinkSet, LotRecord, RunOutcome};

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Renders the report for `kept` and writes every configured artifact
///
/// Returns the path of the HTML report.
pub fn publish(
    config: &RunConfig,
    kept: &[LotRecord],
    now: DateTime<Utc>,
) -> Result<PathBuf, RunError> {
    let tz = config.tz()?;
    let now = now.with_timezone(&tz);
    let next_run = report::next_run(&now, config.run_hour).ok_or_else(|| {
        ConfigError::InvalidValue {
            key: "run_hour".to_string(),
            value: config.run_hour.to_string(),
        }
    })?;

    let ctx = report::ReportContext {
        title: config.report_title.clone(),
        source_url: config.base_url.clone(),
        generated_at: now,
        next_run,
        zone_name: config.timezone.clone(),
        run_hour: config.run_hour,
    };

    let html = report::render(kept, &ctx);
    report::write_artifact(&config.output, &html)?;
    ::log::info!("Wrote report to {}", config.output.display());

    if let Some(path) = &config.json_output {
        report::write_json(path, kept)?;
        ::log::info!("Wrote {} records to {}", kept.len(), path.display());
    }

    Ok(config.output.clone())
}
