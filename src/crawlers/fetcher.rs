use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::config::RunConfig;
use crate::error::FetchError;

/// Loads a URL and returns its fully rendered markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Runs one fetch, giving up after `limit`
pub async fn fetch_within<F: PageFetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    limit: Duration,
) -> Result<String, FetchError> {
    match timeout(limit, fetcher.fetch(url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            url: url.to_string(),
            timeout: limit,
        }),
    }
}

/// Headless browser session driven through WebDriver
pub struct WebDriverFetcher {
    client: Client,
    settle: Duration,
}

impl WebDriverFetcher {
    /// Opens a browser session for the run
    pub async fn connect(config: &RunConfig) -> Result<Self, FetchError> {
        let client = connect_to_webdriver(&config.webdriver_url, config.headless).await?;
        Ok(Self {
            client,
            settle: config.settle(),
        })
    }

    /// Ends the browser session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }

    async fn load(&self, url: &str) -> Result<String, fantoccini::error::CmdError> {
        // pageLoadStrategy "eager" returns once the DOM is parsed
        self.client.goto(url).await?;
        // Trigger lazy-loaded content
        self.client.execute(SCROLL_TO_BOTTOM, vec![]).await?;
        sleep(self.settle).await;
        self.client.source().await
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let worker_start = std::time::Instant::now();
        ::log::debug!("FETCH: {}", url);

        let html = self
            .load(url)
            .await
            .map_err(|source| FetchError::Navigation {
                url: url.to_string(),
                source,
            })?;

        ::log::debug!(
            "Loaded {} ({} bytes) in {:.2} seconds",
            url,
            html.len(),
            worker_start.elapsed().as_secs_f64()
        );
        Ok(html)
    }
}

fn capabilities(headless: bool) -> serde_json::Map<String, serde_json::Value> {
    let mut args = vec!["--disable-gpu", "--no-sandbox", "--window-size=1366,900"];
    if headless {
        args.push("--headless=new");
    }
    let mut firefox_args = Vec::new();
    if headless {
        firefox_args.push("-headless");
    }

    let mut caps = serde_json::Map::new();
    caps.insert("pageLoadStrategy".to_string(), json!("eager"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps.insert(
        "moz:firefoxOptions".to_string(),
        json!({ "args": firefox_args }),
    );
    caps
}

async fn connect_once(
    url: &str,
    caps: &serde_json::Map<String, serde_json::Value>,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(caps.clone());
    builder.connect(url).await
}

/// Connects to the WebDriver instance, trying the usual local ports if the configured one fails
async fn connect_to_webdriver(webdriver_url: &str, headless: bool) -> Result<Client, FetchError> {
    let caps = capabilities(headless);

    let first_error = match connect_once(webdriver_url, &caps).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // geckodriver / Selenium default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = connect_once(url, &caps).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(FetchError::Connect {
        url: webdriver_url.to_string(),
        reason: first_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_request_eager_loading() {
        let caps = capabilities(true);
        assert_eq!(caps["pageLoadStrategy"], "eager");
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a.as_str() == Some("--headless=new")));
    }

    #[test]
    fn test_headed_capabilities() {
        let caps = capabilities(false);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a.as_str().unwrap_or("").starts_with("--headless")));
        assert!(caps["moz:firefoxOptions"]["args"].as_array().unwrap().is_empty());
    }
}
