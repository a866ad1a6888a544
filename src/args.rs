use clap::Parser;
use lot_watch::{FailurePolicy, RunConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lot-watch")]
#[command(about = "Crawls auction sales for matching lots and publishes them as a static page")]
#[command(version)]
pub struct Args {
    /// JSON configuration file (all fields optional)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Origin of the auction site
    #[arg(long)]
    pub base: Option<String>,

    /// Path of the sale index
    #[arg(long)]
    pub listing_path: Option<String>,

    /// Keyword regex matched against lot titles and descriptions
    #[arg(short, long)]
    pub keywords: Option<String>,

    /// Delay between page loads, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Maximum number of listing pages to traverse
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Pages to scan per sale (1 = sale page only)
    #[arg(long)]
    pub max_sale_pages: Option<usize>,

    /// IANA timezone for report timestamps
    #[arg(long)]
    pub timezone: Option<String>,

    /// Where to write the HTML report
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also dump kept lots as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Abort the run on the first page that fails to load
    #[arg(long)]
    pub strict: bool,
}

impl Args {
    /// Applies command-line overrides on top of `config`
    pub fn apply(self, config: &mut RunConfig) {
        if let Some(base) = self.base {
            config.base_url = base;
        }
        if let Some(path) = self.listing_path {
            config.listing_path = path;
        }
        if let Some(keywords) = self.keywords {
            config.keywords = keywords;
        }
        if let Some(delay) = self.delay_ms {
            config.delay_ms = delay;
        }
        if let Some(max) = self.max_pages {
            config.max_pages = max;
        }
        if let Some(max) = self.max_sale_pages {
            config.max_sale_pages = max;
        }
        if let Some(tz) = self.timezone {
            config.timezone = tz;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.json.is_some() {
            config.json_output = self.json;
        }
        if let Some(url) = self.webdriver {
            config.webdriver_url = url;
        }
        if self.headed {
            config.headless = false;
        }
        if self.strict {
            config.failure_policy = FailurePolicy::Strict;
        }
    }
}
