use crate::checks::Rule;
use crate::results::{Finding, Severity};
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Checks specialized content: data tables without headers, media without
/// captions or controls, and color-only information (WCAG 1.3.1, 1.4.1).
pub struct ContentExtras;

impl Rule for ContentExtras {
    fn name(&self) -> &'static str {
        "content-extras"
    }

    fn inspect(&self, doc: &Html, _url: &Url) -> Vec<Finding> {
        let table_selector = Selector::parse("table").unwrap();
        let header_selector = Selector::parse("th, thead").unwrap();
        let media_selector = Selector::parse("video, audio").unwrap();
        let track_selector = Selector::parse("track").unwrap();

        let mut details = Vec::new();

        let mut table_issues = 0usize;
        for table in doc.select(&table_selector) {
            if table.select(&header_selector).next().is_none() {
                table_issues += 1;
                details.push("table without header cells (th/thead) found".to_string());
            }
        }

        let mut media_issues = 0usize;
        for media in doc.select(&media_selector) {
            let has_track = media.select(&track_selector).next().is_some();
            let has_controls = media.value().attr("controls").is_some();
            if !has_track && !has_controls {
                media_issues += 1;
                details.push(format!(
                    "{} element without captions or controls",
                    media.value().name()
                ));
            }
        }

        // Repeated color words hint at information conveyed by color alone.
        let color_words = Regex::new(r"(?i)\b(red|green|blue|rot|grün|blau)\b").unwrap();
        let body_selector = Selector::parse("body").unwrap();
        let text: String = doc
            .select(&body_selector)
            .flat_map(|body| body.text())
            .collect::<Vec<_>>()
            .join(" ");
        let color_mentions = color_words.find_iter(&text).count();
        let color_issue = color_mentions > 3;
        if color_issue {
            details.push("possibly color-based information detected".to_string());
        }

        let total = table_issues + media_issues + usize::from(color_issue);
        if total == 0 {
            return Vec::new();
        }

        details.push("Fix: use <th scope=\"col\">Column</th> in data tables".to_string());
        vec![Finding {
            issue_type: "content-extras".to_string(),
            wcag_criterion: "1.3.1 Info and Relationships, 1.4.1 Use of Color".to_string(),
            severity: Severity::ShouldDo,
            description: format!("{table_issues} table, {media_issues} media problems"),
            details,
            count: total,
            effort_hours: table_issues as f64 * 0.35
                + media_issues as f64 * 0.75
                + if color_issue { 0.35 } else { 0.0 },
            impact: "Medium - specialized content types are inaccessible".to_string(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspect(html: &str) -> Vec<Finding> {
        let doc = Html::parse_document(html);
        let url = Url::parse("https://example.com/").unwrap();
        ContentExtras.inspect(&doc, &url)
    }

    #[test]
    fn accessible_content_is_clean() {
        let findings = inspect(
            r#"<table><thead><tr><th>Name</th></tr></thead></table>
               <video controls src="v.mp4"></video>"#,
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn headerless_table_is_flagged() {
        let findings = inspect("<table><tr><td>1</td></tr></table>");
        assert_eq!(findings[0].count, 1);
        assert!(findings[0].details[0].contains("th/thead"));
    }

    #[test]
    fn media_without_track_or_controls_is_flagged() {
        let findings = inspect(r#"<video src="v.mp4"></video><audio src="a.mp3"></audio>"#);
        assert_eq!(findings[0].count, 2);
    }

    #[test]
    fn media_with_track_is_fine() {
        let findings =
            inspect(r#"<video src="v.mp4"><track kind="captions" src="c.vtt"></video>"#);
        assert!(findings.is_empty());
    }

    #[test]
    fn repeated_color_words_are_flagged() {
        let findings = inspect(
            "<body><p>The red light means stop, green means go, blue means wait, red again.</p></body>",
        );
        assert_eq!(findings[0].count, 1);
        assert!(findings[0].details[0].contains("color-based"));
    }
}
