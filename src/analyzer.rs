use crate::checks::{Rule, default_rules};
use crate::discovery::PageSkeleton;
use crate::render::Renderer;
use crate::results::{FetchStatus, Finding, PageRecord};
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Runs the rule registry against one rendered page.
pub struct PageAnalyzer {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for PageAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageAnalyzer {
    /// Analyzer with the built-in rule catalog
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Analyzer with a custom rule list
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Render a page and fold every rule's findings into its record.
    ///
    /// A render failure yields a failed record with zero findings; it never
    /// aborts the run.
    pub async fn analyze<R: Renderer>(
        &self,
        renderer: &R,
        page: &PageSkeleton,
        timeout: Duration,
    ) -> PageRecord {
        match renderer.render(&page.url, timeout).await {
            Ok(html) => {
                let findings = self.inspect(&html, &page.url);
                ::log::debug!("{}: {} findings", page.label, findings.len());
                PageRecord {
                    url: page.key.to_string(),
                    label: page.label.clone(),
                    status: FetchStatus::Analyzed,
                    findings,
                }
            }
            Err(err) => {
                ::log::warn!("skipping {}: {}", page.url, err);
                PageRecord {
                    url: page.key.to_string(),
                    label: page.label.clone(),
                    status: FetchStatus::Failed {
                        reason: err.to_string(),
                    },
                    findings: Vec::new(),
                }
            }
        }
    }

    /// Parse the markup and run every registered rule over it.
    pub fn inspect(&self, html: &str, url: &Url) -> Vec<Finding> {
        let doc = Html::parse_document(html);
        self.rules
            .iter()
            .flat_map(|rule| rule.inspect(&doc, url))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{Canonicalizer, Provenance};
    use crate::fetch::testing::StubFetcher;
    use crate::render::HttpRenderer;
    use crate::results::Severity;

    fn skeleton(url: &str) -> PageSkeleton {
        let parsed = Url::parse(url).unwrap();
        let canonicalizer = Canonicalizer::new(parsed.clone(), &["en".to_string()], false);
        let key = canonicalizer.canonicalize(&parsed).unwrap();
        let label = if key.path() == "/" {
            "Homepage".to_string()
        } else {
            key.path().to_string()
        };
        PageSkeleton {
            url: parsed.clone(),
            key,
            label,
            provenance: Provenance::Seed,
        }
    }

    #[tokio::test]
    async fn analyzed_page_carries_findings() {
        let mut fetcher = StubFetcher::new();
        fetcher.insert(
            "https://example.com/",
            200,
            r#"<html><head></head><body><img src="a.png"></body></html>"#,
        );

        let analyzer = PageAnalyzer::new();
        let renderer = HttpRenderer::new(&fetcher);
        let record = analyzer
            .analyze(&renderer, &skeleton("https://example.com/"), Duration::from_secs(5))
            .await;

        assert!(record.status.is_analyzed());
        assert!(
            record
                .findings
                .iter()
                .any(|f| f.issue_type == "missing-alt-text")
        );
        assert!(
            record
                .findings
                .iter()
                .any(|f| f.issue_type == "page-structure" && f.severity == Severity::Mandatory)
        );
    }

    #[tokio::test]
    async fn failed_render_becomes_a_failed_record() {
        let fetcher = StubFetcher::new();
        let analyzer = PageAnalyzer::new();
        let renderer = HttpRenderer::new(&fetcher);
        let record = analyzer
            .analyze(
                &renderer,
                &skeleton("https://example.com/missing"),
                Duration::from_secs(5),
            )
            .await;

        assert!(!record.status.is_analyzed());
        assert!(record.findings.is_empty());
    }

    #[test]
    fn custom_rule_lists_are_respected() {
        struct Nothing;
        impl Rule for Nothing {
            fn name(&self) -> &'static str {
                "nothing"
            }
            fn inspect(&self, _doc: &Html, _url: &Url) -> Vec<Finding> {
                Vec::new()
            }
        }

        let analyzer = PageAnalyzer::with_rules(vec![Box::new(Nothing)]);
        let url = Url::parse("https://example.com/").unwrap();
        assert!(analyzer.inspect("<html></html>", &url).is_empty());
    }
}
