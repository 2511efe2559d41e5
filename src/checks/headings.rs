use crate::checks::{Rule, truncate};
use crate::results::{Finding, Severity};
use scraper::{Html, Selector};
use url::Url;

/// Checks the heading outline: exactly one H1 and no skipped levels
/// (WCAG 1.3.1).
pub struct HeadingStructure;

impl Rule for HeadingStructure {
    fn name(&self) -> &'static str {
        "heading-structure"
    }

    fn inspect(&self, doc: &Html, _url: &Url) -> Vec<Finding> {
        let selector = Selector::parse("h1, h2, h3, h4, h5, h6").unwrap();
        let headings: Vec<_> = doc.select(&selector).collect();

        let mut findings = Vec::new();

        let h1_texts: Vec<String> = headings
            .iter()
            .filter(|h| h.value().name() == "h1")
            .map(|h| truncate(h.text().collect::<String>().trim(), 50))
            .collect();

        if h1_texts.len() > 1 {
            findings.push(Finding {
                issue_type: "multiple-h1".to_string(),
                wcag_criterion: "1.3.1 Info and Relationships".to_string(),
                severity: Severity::ShouldDo,
                description: format!(
                    "{} H1 headings found (a page should have exactly one)",
                    h1_texts.len()
                ),
                details: vec![
                    format!("H1 headings found: {}", h1_texts.join(", ")),
                    "Fix: keep a single H1 per page".to_string(),
                ],
                count: h1_texts.len() - 1,
                effort_hours: 0.25,
                impact: "Significant - screen reader navigation is severely impaired".to_string(),
            });
        } else if h1_texts.is_empty() {
            findings.push(Finding {
                issue_type: "missing-h1".to_string(),
                wcag_criterion: "1.3.1 Info and Relationships".to_string(),
                severity: Severity::ShouldDo,
                description: "no H1 heading found".to_string(),
                details: vec!["Fix: add an H1 carrying the page topic".to_string()],
                count: 1,
                effort_hours: 0.15,
                impact: "Medium - the page has no clear hierarchy".to_string(),
            });
        }

        // A jump of more than one level (H2 -> H4) breaks the outline.
        let levels: Vec<u32> = headings
            .iter()
            .filter_map(|h| h.value().name().strip_prefix('h')?.parse().ok())
            .collect();
        let mut skipped = Vec::new();
        for window in levels.windows(2) {
            if window[1] > window[0] + 1 {
                skipped.push(format!("jumped from H{} to H{}", window[0], window[1]));
            }
        }

        if !skipped.is_empty() {
            let count = skipped.len();
            skipped.push("Fix: nest headings in order, H1 then H2 then H3".to_string());
            findings.push(Finding {
                issue_type: "heading-hierarchy".to_string(),
                wcag_criterion: "1.3.1 Info and Relationships".to_string(),
                severity: Severity::ShouldDo,
                description: format!("{count} skipped heading levels"),
                details: skipped,
                count,
                effort_hours: count as f64 * 0.15,
                impact: "Medium - the content structure reads illogically".to_string(),
            });
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspect(html: &str) -> Vec<Finding> {
        let doc = Html::parse_document(html);
        let url = Url::parse("https://example.com/").unwrap();
        HeadingStructure.inspect(&doc, &url)
    }

    #[test]
    fn well_formed_outline_is_clean() {
        let findings = inspect("<h1>Title</h1><h2>Part</h2><h3>Sub</h3><h2>Other</h2>");
        assert!(findings.is_empty());
    }

    #[test]
    fn multiple_h1_are_flagged() {
        let findings = inspect("<h1>One</h1><h1>Two</h1><h1>Three</h1>");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].issue_type, "multiple-h1");
        assert_eq!(findings[0].count, 2);
    }

    #[test]
    fn missing_h1_is_flagged() {
        let findings = inspect("<h2>Part</h2>");
        assert_eq!(findings[0].issue_type, "missing-h1");
        assert_eq!(findings[0].count, 1);
    }

    #[test]
    fn skipped_levels_are_counted() {
        let findings = inspect("<h1>T</h1><h3>skip</h3><h2>fine</h2><h5>skip</h5>");
        let hierarchy = findings
            .iter()
            .find(|f| f.issue_type == "heading-hierarchy")
            .unwrap();
        assert_eq!(hierarchy.count, 2);
        assert!(hierarchy.details[0].contains("H1 to H3"));
    }

    #[test]
    fn descending_levels_are_fine() {
        let findings = inspect("<h1>T</h1><h2>A</h2><h3>B</h3><h1>again?</h1>");
        // Going back up is fine; the second H1 is the only problem.
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].issue_type, "multiple-h1");
    }
}
