use crate::checks::{Rule, truncate};
use crate::results::{Finding, Severity};
use scraper::{Html, Selector};
use url::Url;

/// Source-path fragments that suggest a purely decorative image, where an
/// empty alt attribute is acceptable.
const DECORATIVE_HINTS: &[&str] = &["icon", "decoration", "spacer", "bg"];

/// Checks that images carry usable alt text (WCAG 1.1.1).
pub struct AltText;

impl Rule for AltText {
    fn name(&self) -> &'static str {
        "alt-text"
    }

    fn inspect(&self, doc: &Html, _url: &Url) -> Vec<Finding> {
        let selector = Selector::parse("img").unwrap();
        let images: Vec<_> = doc.select(&selector).collect();
        if images.is_empty() {
            return Vec::new();
        }

        let mut missing_alt = 0usize;
        let mut empty_alt = 0usize;
        let mut decorative = 0usize;
        let mut details = Vec::new();

        for img in &images {
            let src = img.value().attr("src").unwrap_or("unknown");
            match img.value().attr("alt") {
                None => {
                    missing_alt += 1;
                    details.push(format!("image without alt text: {}", truncate(src, 50)));
                }
                Some(alt) if alt.trim().is_empty() => {
                    let src_lower = src.to_lowercase();
                    if DECORATIVE_HINTS.iter().any(|hint| src_lower.contains(hint)) {
                        decorative += 1;
                    } else {
                        empty_alt += 1;
                        details.push(format!("image with empty alt text: {}", truncate(src, 50)));
                    }
                }
                Some(alt) if alt.chars().count() > 100 => {
                    details.push(format!(
                        "alt text too long ({} chars): {}",
                        alt.chars().count(),
                        truncate(alt, 50)
                    ));
                }
                Some(_) => {}
            }
        }

        let total_issues = missing_alt + empty_alt;
        if total_issues == 0 {
            return Vec::new();
        }

        // Widespread alt-text gaps point at a systemic problem.
        let severity = if total_issues as f64 > images.len() as f64 * 0.3 {
            Severity::Mandatory
        } else {
            Severity::ShouldDo
        };

        let mut description = format!(
            "{} of {} images without proper alt text",
            total_issues,
            images.len()
        );
        if decorative > 0 {
            description.push_str(&format!(" ({decorative} presumably decorative)"));
        }

        details.truncate(8);
        vec![Finding {
            issue_type: "missing-alt-text".to_string(),
            wcag_criterion: "1.1.1 Non-text Content".to_string(),
            severity,
            description,
            details,
            count: total_issues,
            effort_hours: (total_issues as f64 * 0.15).max(0.25),
            impact: "Critical - screen reader users cannot perceive essential image information"
                .to_string(),
        }]
    }
}
