use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::classifier::{LinkClassifier, LinkPatterns};
use crate::error::ConfigError;
use crate::parsers::lot::KeywordFilter;

/// What to do when a page cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure, skip the URL and keep going
    #[default]
    Isolate,
    /// Abort the whole run on the first failure; nothing is written
    Strict,
}

/// Configuration for one crawl-and-report run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Origin of the auction site
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the sale index, relative to `base_url`
    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    /// Regex a lot's title or description must match to be kept
    #[serde(default = "default_keywords")]
    pub keywords: String,

    /// Minimum spacing between two page fetches, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Maximum number of listing pages to traverse
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Pages scanned per sale (1 = the sale page alone)
    #[serde(default = "default_max_sale_pages")]
    pub max_sale_pages: usize,

    /// IANA timezone used for report timestamps and the run schedule
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Local hour of the daily run announced by the report
    #[serde(default = "default_run_hour")]
    pub run_hour: u32,

    /// Where the HTML report is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Optional JSON dump of the kept records
    #[serde(default)]
    pub json_output: Option<PathBuf>,

    /// Heading of the report page
    #[serde(default = "default_report_title")]
    pub report_title: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Timeout for a single page load, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Pause after scrolling, before capturing markup, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Link classification patterns
    #[serde(default)]
    pub links: LinkPatterns,
}

fn default_base_url() -> String {
    "https://encheres-domaine.gouv.fr".to_string()
}

fn default_listing_path() -> String {
    "/ventes".to_string()
}

fn default_keywords() -> String {
    r"\b(montre|montres|horlogerie)\b".to_string()
}

fn default_delay_ms() -> u64 {
    800
}

fn default_max_pages() -> usize {
    400
}

fn default_max_sale_pages() -> usize {
    1
}

fn default_timezone() -> String {
    "Europe/Paris".to_string()
}

fn default_run_hour() -> u32 {
    10
}

fn default_output() -> PathBuf {
    PathBuf::from("public/montres.html")
}

fn default_report_title() -> String {
    "Montres — Enchères du Domaine".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_fetch_timeout_secs() -> u64 {
    60
}

fn default_settle_ms() -> u64 {
    500
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            listing_path: default_listing_path(),
            keywords: default_keywords(),
            delay_ms: default_delay_ms(),
            max_pages: default_max_pages(),
            max_sale_pages: default_max_sale_pages(),
            timezone: default_timezone(),
            run_hour: default_run_hour(),
            output: default_output(),
            json_output: None,
            report_title: default_report_title(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            settle_ms: default_settle_ms(),
            failure_policy: FailurePolicy::default(),
            links: LinkPatterns::default(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Applies overrides from environment-style pairs
    ///
    /// Unknown keys are ignored and empty values leave the field untouched.
    pub fn apply_env<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            if value.is_empty() {
                continue;
            }
            match key {
                "BASE" => self.base_url = value.to_string(),
                "KEYWORDS" => self.keywords = value.to_string(),
                "DELAY_MS" => self.delay_ms = parse_number(key, value)?,
                "MAX_PAGES" => self.max_pages = parse_number(key, value)?,
                "MAX_SALE_PAGES" => self.max_sale_pages = parse_number(key, value)?,
                "TZ_NAME" => self.timezone = value.to_string(),
                "RUN_HOUR" => self.run_hour = parse_number(key, value)?,
                "OUTPUT" => self.output = PathBuf::from(value),
                "WEBDRIVER_URL" => self.webdriver_url = value.to_string(),
                "STRICT" => {
                    if parse_flag(key, value)? {
                        self.failure_policy = FailurePolicy::Strict;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Checks every derived value so a run cannot fail halfway on bad config
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.start_url()?;
        self.tz()?;
        KeywordFilter::new(&self.keywords).map_err(|source| ConfigError::Pattern {
            name: "keywords",
            source,
        })?;
        LinkClassifier::new(&self.links).map_err(|source| ConfigError::Pattern {
            name: "links",
            source,
        })?;
        if self.run_hour > 23 {
            return Err(ConfigError::InvalidValue {
                key: "run_hour".to_string(),
                value: self.run_hour.to_string(),
            });
        }
        if self.max_sale_pages == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_sale_pages".to_string(),
                value: "0".to_string(),
            });
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// First listing page: `listing_path` joined onto `base_url`
    pub fn start_url(&self) -> Result<String, ConfigError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(&self.listing_path))
            .map(|url| url.to_string())
            .map_err(|_| ConfigError::BaseUrl(self.base_url.clone()))
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Timezone(self.timezone.clone()))
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
