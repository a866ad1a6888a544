use clap::Parser;
use lot_watch::{Pipeline, RunConfig, WebDriverFetcher};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    // Defaults, then config file, then environment, then command line
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    config.apply_env(std::env::vars())?;
    args.apply(&mut config);
    config.validate()?;

    ::log::info!("Starting run against {}", config.base_url);
    println!("Note: crawling requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL if not using the default {}",
        config.webdriver_url
    );

    let fetcher = WebDriverFetcher::connect(&config).await?;
    let mut pipeline = Pipeline::new(&config, fetcher)?;
    let result = pipeline.run().await;
    pipeline.into_fetcher().close().await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            ::log::error!("Run aborted, no report written: {}", e);
            return Err(e.into());
        }
    };

    if !outcome.failures.is_empty() {
        ::log::warn!("{} pages could not be loaded and were skipped", outcome.failures.len());
        for failure in &outcome.failures {
            ::log::debug!("  {}", failure);
        }
    }

    let path = lot_watch::publish(&config, &outcome.kept, chrono::Utc::now())?;
    println!(
        "OK — {} lots exportés dans {}",
        outcome.kept.len(),
        path.display()
    );
    Ok(())
}
