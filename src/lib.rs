pub mod analyzer;
pub mod canonical;
pub mod checks;
pub mod config;
pub mod consolidate;
pub mod discovery;
pub mod error;
pub mod fetch;
pub mod render;
pub mod report;
pub mod results;
pub mod tech;

// Re-export commonly used types for convenience
pub use config::AuditConfig;
pub use consolidate::ConsolidatedIssue;
pub use error::AuditError;
pub use report::AuditReport;
pub use results::{PageRecord, Severity};

use crate::analyzer::PageAnalyzer;
use crate::consolidate::Consolidator;
use crate::discovery::{DiscoveryStats, PageSkeleton};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::render::{HttpRenderer, Renderer, WebDriverRenderer};
use crate::tech::Technologies;
use url::Url;

/// Everything a finished audit run produced
#[derive(Debug)]
pub struct AuditOutcome {
    pub site: String,
    pub technologies: Technologies,
    pub stats: DiscoveryStats,
    pub pages: Vec<PageRecord>,
    pub issues: Vec<ConsolidatedIssue>,
    pub warnings: Vec<String>,
}

impl AuditOutcome {
    pub fn report(&self) -> AuditReport<'_> {
        AuditReport::new(
            &self.site,
            &self.technologies,
            &self.stats,
            &self.pages,
            &self.issues,
            &self.warnings,
        )
    }
}

/// Main builder for auditing a site from a seed URL
pub struct Audit {
    config: AuditConfig,
}

impl Audit {
    /// Create a new Audit builder for the given seed URL
    pub fn new(seed_url: &str) -> Self {
        Self {
            config: AuditConfig::new(seed_url),
        }
    }

    /// Use a prepared configuration instead of the defaults
    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, AuditError> {
        let seed_url = self.config.seed_url.clone();
        self.config = AuditConfig::from_file(path)?;
        if self.config.seed_url.is_empty() {
            self.config.seed_url = seed_url;
        }
        Ok(self)
    }

    /// Cap the number of pages admitted for analysis
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Analyze every reachable same-origin page regardless of the cap
    pub fn with_analyze_all(mut self, analyze_all: bool) -> Self {
        self.config.analyze_all = analyze_all;
        self
    }

    /// Render pages through a WebDriver session at the given endpoint
    pub fn with_webdriver_url(mut self, endpoint: &str) -> Self {
        self.config.webdriver_url = Some(endpoint.to_string());
        self
    }

    /// Run the audit
    pub async fn run(self) -> Result<AuditOutcome, AuditError> {
        run_audit(&self.config).await
    }
}

/// Run a full audit: discovery, per-page analysis and consolidation.
pub async fn run_audit(config: &AuditConfig) -> Result<AuditOutcome, AuditError> {
    let fetcher = HttpFetcher::new()?;
    run_with_fetcher(&fetcher, config).await
}

async fn run_with_fetcher<F: Fetcher>(
    fetcher: &F,
    config: &AuditConfig,
) -> Result<AuditOutcome, AuditError> {
    let seed = normalize_seed(&config.seed_url)?;

    // The seed must respond before anything else is attempted; every later
    // failure is per-page and non-fatal.
    let response = fetcher
        .fetch(&seed, config.fetch_timeout())
        .await
        .map_err(|err| AuditError::SeedUnreachable(err.to_string()))?;
    if !response.is_success() {
        return Err(AuditError::SeedUnreachable(format!(
            "HTTP {} from {}",
            response.status, seed
        )));
    }

    let technologies = tech::detect(&response.body);
    let seed_is_spa = tech::is_spa(&response.body);
    ::log::info!("technology: {}", technologies.summary());

    let (skeletons, stats) = discovery::discover(fetcher, &seed, config, seed_is_spa).await;

    let analyzer = PageAnalyzer::new();
    let pages = match &config.webdriver_url {
        Some(endpoint) => match WebDriverRenderer::connect(endpoint).await {
            Ok(renderer) => {
                let pages = analyze_pages(&analyzer, &renderer, &skeletons, config).await;
                renderer.close().await;
                pages
            }
            Err(err) => {
                ::log::warn!("{}, rendering from raw HTTP responses", err);
                let renderer = HttpRenderer::new(fetcher);
                analyze_pages(&analyzer, &renderer, &skeletons, config).await
            }
        },
        None => {
            let renderer = HttpRenderer::new(fetcher);
            analyze_pages(&analyzer, &renderer, &skeletons, config).await
        }
    };

    let mut consolidator = Consolidator::new(config.effort_cap_hours);
    for page in &pages {
        consolidator.fold(page);
    }
    let (issues, warnings) = consolidator.finish();

    Ok(AuditOutcome {
        site: seed.to_string(),
        technologies,
        stats,
        pages,
        issues,
        warnings,
    })
}

/// Analyze every discovered page in order, with a politeness delay between
/// requests.
async fn analyze_pages<R: Renderer>(
    analyzer: &PageAnalyzer,
    renderer: &R,
    skeletons: &[PageSkeleton],
    config: &AuditConfig,
) -> Vec<PageRecord> {
    let mut pages = Vec::with_capacity(skeletons.len());
    for (index, skeleton) in skeletons.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(config.delay()).await;
        }
        ::log::info!(
            "analyzing page {}/{}: {}",
            index + 1,
            skeletons.len(),
            skeleton.url
        );
        pages.push(
            analyzer
                .analyze(renderer, skeleton, config.render_timeout())
                .await,
        );
    }
    pages
}

/// Parse the user-supplied seed, assuming https when no scheme is given.
fn normalize_seed(raw: &str) -> Result<Url, AuditError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    Url::parse(&candidate).map_err(|source| AuditError::InvalidSeed {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StubFetcher;

    #[test]
    fn seed_without_scheme_gets_https() {
        let url = normalize_seed("example.com/start").unwrap();
        assert_eq!(url.as_str(), "https://example.com/start");
    }

    #[test]
    fn seed_with_scheme_is_kept() {
        let url = normalize_seed("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn unparseable_seed_is_rejected() {
        assert!(matches!(
            normalize_seed("http://"),
            Err(AuditError::InvalidSeed { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_seed_is_fatal() {
        let fetcher = StubFetcher::new();
        let config = AuditConfig::new("https://example.com");

        let result = run_with_fetcher(&fetcher, &config).await;
        assert!(matches!(result, Err(AuditError::SeedUnreachable(_))));
    }

    #[tokio::test]
    async fn full_run_discovers_analyzes_and_consolidates() {
        let mut fetcher = StubFetcher::new();
        fetcher.insert(
            "https://example.com/",
            200,
            r#"<html lang="en"><head><title>Example, a fine demo site</title>
               <meta name="viewport" content="width=device-width"></head>
               <body><h1>Hi</h1><img src="a.jpg">
               <a href="/about">About</a></body></html>"#,
        );
        fetcher.insert(
            "https://example.com/about",
            200,
            r#"<html lang="en"><head><title>About this demo website</title>
               <meta name="viewport" content="width=device-width"></head>
               <body><h1>About</h1><img src="b.jpg"></body></html>"#,
        );

        let mut config = AuditConfig::new("https://example.com");
        config.delay_ms = 0;
        let outcome = run_with_fetcher(&fetcher, &config).await.unwrap();

        assert_eq!(outcome.pages.len(), 2);
        assert!(outcome.pages.iter().all(|p| p.status.is_analyzed()));

        let alt = outcome
            .issues
            .iter()
            .find(|i| i.issue_type == "missing-alt-text")
            .expect("missing alt text should be consolidated");
        assert_eq!(alt.count, 2);
        assert_eq!(alt.pages.len(), 2);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn failed_pages_are_recorded_not_fatal() {
        let mut fetcher = StubFetcher::new();
        fetcher.insert(
            "https://example.com/",
            200,
            r#"<html lang="en"><head><title>Example, a fine demo site</title></head>
               <body><h1>Hi</h1><a href="/gone">gone</a></body></html>"#,
        );

        let mut config = AuditConfig::new("https://example.com");
        config.delay_ms = 0;
        let outcome = run_with_fetcher(&fetcher, &config).await.unwrap();

        let gone = outcome
            .pages
            .iter()
            .find(|p| p.url.ends_with("/gone"))
            .expect("crawled page should have a record");
        assert!(!gone.status.is_analyzed());
    }
}
