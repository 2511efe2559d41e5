use crate::checks::{Rule, label_targets};
use crate::results::{Finding, Severity};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Interactive element selectors and their display names
const INTERACTIVE: &[(&str, &str)] = &[
    ("button", "button"),
    (r#"input[type="button"]"#, "button input"),
    (r#"input[type="submit"]"#, "submit button"),
    (r#"[role="button"]"#, "button role"),
    ("[onclick]", "clickable element"),
    ("select", "select"),
    ("textarea", "textarea"),
];

/// Checks that interactive elements are labeled and landmark roles exist
/// (WCAG 4.1.2).
pub struct AriaLabels;

impl Rule for AriaLabels {
    fn name(&self) -> &'static str {
        "aria-labels"
    }

    fn inspect(&self, doc: &Html, _url: &Url) -> Vec<Finding> {
        let labels = label_targets(doc);

        let mut missing_labels = 0usize;
        let mut details = Vec::new();
        let mut seen = HashSet::new();

        for (selector_text, element_type) in INTERACTIVE {
            let selector = Selector::parse(selector_text).unwrap();
            for element in doc.select(&selector) {
                // An element can match several selectors; count it once.
                if !seen.insert(element.id()) {
                    continue;
                }
                if has_accessible_name(&element, &labels) {
                    continue;
                }
                missing_labels += 1;
                let mut desc = format!("{}: {}", element_type, element.value().name());
                if let Some(class) = element.value().attr("class") {
                    let classes: Vec<&str> = class.split_whitespace().take(2).collect();
                    if !classes.is_empty() {
                        desc.push_str(&format!(" (class: {})", classes.join(" ")));
                    }
                }
                details.push(desc);
            }
        }

        let mut landmark_issues = 0usize;
        if !has_any(doc, &["main", r#"[role="main"]"#]) {
            landmark_issues += 1;
            details.push("no <main> element or role='main' found".to_string());
        }
        if !has_any(doc, &["nav", r#"[role="navigation"]"#]) {
            landmark_issues += 1;
            details.push("no <nav> element or role='navigation' found".to_string());
        }

        let total = missing_labels + landmark_issues;
        if total == 0 {
            return Vec::new();
        }

        let severity = if missing_labels > 5 {
            Severity::Mandatory
        } else {
            Severity::ShouldDo
        };

        details.truncate(10);
        vec![Finding {
            issue_type: "aria-labels".to_string(),
            wcag_criterion: "4.1.2 Name, Role, Value".to_string(),
            severity,
            description: format!(
                "{missing_labels} interactive elements without an accessible name, {landmark_issues} missing landmarks"
            ),
            details,
            count: total,
            effort_hours: (missing_labels as f64 * 0.15 + landmark_issues as f64 * 0.75).max(0.5),
            impact: "Critical - assistive technologies cannot identify these elements".to_string(),
        }]
    }
}

/// An element is named if any of the standard labeling mechanisms applies.
fn has_accessible_name(element: &ElementRef, labels: &HashSet<String>) -> bool {
    let value = element.value();
    if value.attr("aria-label").is_some_and(|v| !v.trim().is_empty()) {
        return true;
    }
    if value.attr("aria-labelledby").is_some() {
        return true;
    }
    if value.name() == "input"
        && value
            .attr("id")
            .is_some_and(|id| labels.contains(id))
    {
        return true;
    }
    if !element.text().collect::<String>().trim().is_empty() {
        return true;
    }
    if value.attr("title").is_some_and(|v| !v.trim().is_empty()) {
        return true;
    }
    if value.attr("value").is_some()
        && matches!(value.attr("type"), Some("submit") | Some("button"))
    {
        return true;
    }
    false
}

fn has_any(doc: &Html, selectors: &[&str]) -> bool {
    selectors.iter().any(|text| {
        let selector = Selector::parse(text).unwrap();
        doc.select(&selector).next().is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspect(html: &str) -> Vec<Finding> {
        let doc = Html::parse_document(html);
        let url = Url::parse("https://example.com/").unwrap();
        AriaLabels.inspect(&doc, &url)
    }

    const LANDMARKS: &str = "<main></main><nav><a href='/'>Home</a></nav>";

    #[test]
    fn labeled_elements_with_landmarks_are_clean() {
        let findings = inspect(&format!(
            r#"{LANDMARKS}<button>Save</button><button aria-label="Close"></button>
               <input type="submit" value="Send"><input id="q" type="text"><label for="q">Query</label>"#
        ));
        assert!(findings.is_empty());
    }

    #[test]
    fn unnamed_buttons_are_reported() {
        let findings = inspect(&format!(
            r#"{LANDMARKS}<button></button><button class="btn icon x"></button>"#
        ));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].count, 2);
        assert_eq!(findings[0].severity, Severity::ShouldDo);
        assert!(findings[0].details[1].contains("class: btn icon"));
    }

    #[test]
    fn missing_landmarks_are_counted() {
        let findings = inspect("<div>content</div><button></button>");
        assert_eq!(findings[0].count, 3);
        assert!(
            findings[0]
                .details
                .iter()
                .any(|d| d.contains("role='main'"))
        );
    }

    #[test]
    fn many_unnamed_elements_escalate_to_mandatory() {
        let buttons = "<button></button>".repeat(6);
        let findings = inspect(&format!("{LANDMARKS}{buttons}"));
        assert_eq!(findings[0].severity, Severity::Mandatory);
    }

    #[test]
    fn element_matching_two_selectors_counts_once() {
        let findings = inspect(&format!(r#"{LANDMARKS}<button onclick="go()"></button>"#));
        assert_eq!(findings[0].count, 1);
    }
}
