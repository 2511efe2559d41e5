use crate::checks::Rule;
use crate::results::{Finding, Severity};
use scraper::{Html, Selector};
use url::Url;

/// Checks page fundamentals: title, language attribute, viewport meta and
/// skip links (WCAG 2.4.2, 3.1.1, 2.4.1).
pub struct PageBasics;

impl Rule for PageBasics {
    fn name(&self) -> &'static str {
        "page-basics"
    }

    fn inspect(&self, doc: &Html, _url: &Url) -> Vec<Finding> {
        let mut critical = Vec::new();
        let mut extras = Vec::new();

        let title_selector = Selector::parse("title").unwrap();
        let title = doc
            .select(&title_selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        if title.is_empty() {
            critical.push("missing or empty page title".to_string());
        } else if title.chars().count() < 10 {
            critical.push(format!("page title too short: '{title}'"));
        } else if title.chars().count() > 60 {
            critical.push(format!("page title too long ({} chars)", title.chars().count()));
        }

        let html_selector = Selector::parse("html").unwrap();
        let lang = doc
            .select(&html_selector)
            .next()
            .and_then(|el| el.value().attr("lang"));
        if lang.is_none_or(|l| l.trim().is_empty()) {
            critical.push("html element without a lang attribute".to_string());
        }

        let viewport_selector = Selector::parse(r#"meta[name="viewport"]"#).unwrap();
        if doc.select(&viewport_selector).next().is_none() {
            extras.push("viewport meta tag missing".to_string());
        }

        if !has_skip_link(doc) {
            extras.push("no skip-to-content link found".to_string());
        }

        let mut findings = Vec::new();
        if !critical.is_empty() {
            let count = critical.len();
            critical.push("Fix: set <html lang=\"en\"> and a descriptive <title>".to_string());
            findings.push(Finding {
                issue_type: "page-structure".to_string(),
                wcag_criterion: "3.1.1 Language of Page, 2.4.2 Page Titled".to_string(),
                severity: Severity::Mandatory,
                description: format!("{count} critical page-structure problems"),
                details: critical,
                count,
                effort_hours: count as f64 * 0.15,
                impact: "Critical - fundamental web standards are not met".to_string(),
            });
        }
        if !extras.is_empty() {
            let count = extras.len();
            extras.push("Fix: add a 'skip to main content' link at the top".to_string());
            findings.push(Finding {
                issue_type: "extended-accessibility".to_string(),
                wcag_criterion: "2.4.1 Bypass Blocks".to_string(),
                severity: Severity::NiceToHave,
                description: format!("{count} improvement opportunities"),
                details: extras,
                count,
                effort_hours: count as f64 * 0.35,
                impact: "Low - improves the overall experience".to_string(),
            });
        }
        findings
    }
}

/// A same-page anchor whose text mentions content or skipping.
fn has_skip_link(doc: &Html) -> bool {
    let selector = Selector::parse(r##"a[href^="#"]"##).unwrap();
    doc.select(&selector).any(|link| {
        let text = link.text().collect::<String>().to_lowercase();
        text.contains("content") || text.contains("skip") || text.contains("inhalt")
    })
}
