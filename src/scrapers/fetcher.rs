use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::logger;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

/// Retrieval capability: GET a URL and return its body.
///
/// Implementations report any non-success status as `ScrapeError::Fetch`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// `PageFetcher` backed by a `reqwest` client with the configured
/// User-Agent and timeout.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.http.user_agent.as_str())
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .map_err(|e| ScrapeError::Config {
                message: format!("cannot build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        logger::debug(&format!("GET {}", url));
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::fetch(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::fetch(url, format!("HTTP error: {}", status)));
        }

        resp.text().await.map_err(|e| ScrapeError::fetch(url, e))
    }
}

/// Everything an operation needs to reach the network: the fetcher and the
/// configuration it was built from.
pub struct RetrievalContext {
    fetcher: Box<dyn PageFetcher>,
    pub config: Config,
}

impl RetrievalContext {
    /// Context with an HTTP fetcher built from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher<F: PageFetcher + 'static>(config: Config, fetcher: F) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            config,
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<String> {
        self.fetcher.fetch(url).await
    }

    /// Polite delay between requests.
    pub async fn pause(&self) {
        if self.config.http.delay_ms > 0 {
            sleep(Duration::from_millis(self.config.http.delay_ms)).await;
        }
    }
}
