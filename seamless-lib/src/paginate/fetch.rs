//! Page fetching.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use url::Url;

use crate::config::FilterConfig;
use crate::error::FetchError;

/// Fetches the HTML of one pagination page.
///
/// Implementations must report non-success statuses as errors; the loader
/// treats any error as "page unavailable" and never retries.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// [`PageFetcher`] over HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client honoring the configured request timeout.
    pub fn new(config: &FilterConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("seamless-lib/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        log::trace!("GET {url}");
        let response = self
            .client
            .get(url.as_str())
            .header(ACCEPT, "text/html")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http(status.as_u16(), url.as_str()));
        }
        Ok(response.text().await?)
    }
}
