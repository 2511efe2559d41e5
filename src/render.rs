use crate::fetch::{FetchError, Fetcher};
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("page returned HTTP {0}")]
    Status(u16),

    #[error("webdriver: {0}")]
    WebDriver(String),

    #[error("render timed out after {0:?}")]
    Timeout(Duration),
}

/// Produces the markup a page resolves to, for analysis.
///
/// A failure degrades to a skipped page record, never a fatal error.
#[allow(async_fn_in_trait)]
pub trait Renderer {
    async fn render(&self, url: &Url, timeout: Duration) -> Result<String, RenderError>;
}

/// Renders a page from its raw HTTP response. Sufficient for
/// server-rendered sites; client-side routes need the WebDriver renderer.
pub struct HttpRenderer<'a, F: Fetcher> {
    fetcher: &'a F,
}

impl<'a, F: Fetcher> HttpRenderer<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }
}

impl<F: Fetcher> Renderer for HttpRenderer<'_, F> {
    async fn render(&self, url: &Url, timeout: Duration) -> Result<String, RenderError> {
        let response = self.fetcher.fetch(url, timeout).await?;
        if !response.is_success() {
            return Err(RenderError::Status(response.status));
        }
        Ok(response.body)
    }
}

/// Common WebDriver endpoints tried when the configured one is down
const FALLBACK_ENDPOINTS: &[&str] = &[
    "http://localhost:9515",
    "http://localhost:4444",
    "http://127.0.0.1:4444",
];

/// Renders pages through a WebDriver session, executing client-side
/// scripts, so SPA routes resolve to their real document.
pub struct WebDriverRenderer {
    client: Client,
}

impl WebDriverRenderer {
    /// Connect to the given endpoint, falling back to common local ones.
    pub async fn connect(endpoint: &str) -> Result<Self, RenderError> {
        match ClientBuilder::native().connect(endpoint).await {
            Ok(client) => {
                ::log::debug!("connected to WebDriver at {}", endpoint);
                return Ok(Self { client });
            }
            Err(err) => {
                ::log::warn!("failed to connect to WebDriver at {}: {}", endpoint, err);
            }
        }

        for fallback in FALLBACK_ENDPOINTS {
            if *fallback == endpoint {
                continue;
            }
            if let Ok(client) = ClientBuilder::native().connect(fallback).await {
                ::log::info!("connected to fallback WebDriver at {}", fallback);
                return Ok(Self { client });
            }
        }

        Err(RenderError::WebDriver(format!(
            "no WebDriver server reachable (tried {endpoint} and fallbacks)"
        )))
    }

    pub async fn close(self) {
        if let Err(err) = self.client.close().await {
            ::log::warn!("failed to close WebDriver session: {}", err);
        }
    }
}

impl Renderer for WebDriverRenderer {
    async fn render(&self, url: &Url, timeout: Duration) -> Result<String, RenderError> {
        let navigate = async {
            self.client
                .goto(url.as_str())
                .await
                .map_err(|e| RenderError::WebDriver(e.to_string()))?;
            self.client
                .source()
                .await
                .map_err(|e| RenderError::WebDriver(e.to_string()))
        };

        tokio::time::timeout(timeout, navigate)
            .await
            .map_err(|_| RenderError::Timeout(timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StubFetcher;

    #[tokio::test]
    async fn http_renderer_returns_the_body() {
        let mut fetcher = StubFetcher::new();
        fetcher.insert("https://example.com/", 200, "<html>hi</html>");

        let renderer = HttpRenderer::new(&fetcher);
        let url = Url::parse("https://example.com/").unwrap();
        let html = renderer.render(&url, Duration::from_secs(5)).await.unwrap();
        assert_eq!(html, "<html>hi</html>");
    }

    #[tokio::test]
    async fn http_renderer_surfaces_error_statuses() {
        let mut fetcher = StubFetcher::new();
        fetcher.insert("https://example.com/broken", 503, "oops");

        let renderer = HttpRenderer::new(&fetcher);
        let url = Url::parse("https://example.com/broken").unwrap();
        let err = renderer
            .render(&url, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Status(503)));
    }
}
