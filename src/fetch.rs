use std::time::Duration;
use thiserror::Error;
use url::Url;

/// User agent sent with every request; some sites refuse the default one.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 pagecheck";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Response to a page fetch
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Bounded-timeout HTTP access used by the sitemap reader, the SPA prober
/// and the link crawler.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Fetch a URL and return its status and body
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchResponse, FetchError>;

    /// Low-cost existence probe returning only the status code
    async fn head(&self, url: &Url, timeout: Duration) -> Result<u16, FetchError>;
}

/// Fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchResponse, FetchError> {
        let response = tokio::time::timeout(timeout, self.client.get(url.as_str()).send())
            .await
            .map_err(|_| FetchError::Timeout(timeout))??;

        let status = response.status().as_u16();
        let body = tokio::time::timeout(timeout, response.text())
            .await
            .map_err(|_| FetchError::Timeout(timeout))??;

        ::log::debug!("GET {} -> {}", url, status);
        Ok(FetchResponse { status, body })
    }

    async fn head(&self, url: &Url, timeout: Duration) -> Result<u16, FetchError> {
        let response = tokio::time::timeout(timeout, self.client.head(url.as_str()).send())
            .await
            .map_err(|_| FetchError::Timeout(timeout))??;

        let status = response.status().as_u16();
        ::log::debug!("HEAD {} -> {}", url, status);
        Ok(status)
    }
}
