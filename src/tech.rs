use scraper::{Html, Selector};
use serde::Serialize;

/// Technologies detected on the seed page
#[derive(Debug, Default, Clone, Serialize)]
pub struct Technologies {
    pub cms: Vec<String>,
    pub frameworks: Vec<String>,
    pub libraries: Vec<String>,
}

impl Technologies {
    /// Short summary for the terminal, e.g. "WordPress, Bootstrap"
    pub fn summary(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(self.cms.iter().map(String::as_str));
        parts.extend(self.frameworks.iter().take(2).map(String::as_str));
        if parts.is_empty() {
            "not detected".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Fingerprint CMS, frameworks and libraries from a page body.
pub fn detect(html: &str) -> Technologies {
    let lower = html.to_lowercase();
    let mut tech = Technologies::default();

    if html.contains("wp-content") || html.contains("wp-includes") {
        tech.cms.push("WordPress".to_string());
    } else if html.contains("/sites/default/") || html.contains("Drupal.settings") {
        tech.cms.push("Drupal".to_string());
    } else if html.contains("/components/com_") || lower.contains("joomla") {
        tech.cms.push("Joomla".to_string());
    } else if lower.contains("typo3") {
        tech.cms.push("TYPO3".to_string());
    } else if lower.contains("shopify") {
        tech.cms.push("Shopify".to_string());
    }

    if lower.contains("react") && (html.contains("react-dom") || html.contains("ReactDOM")) {
        tech.frameworks.push("React".to_string());
    } else if lower.contains("vue") && (html.contains("vue.js") || html.contains("Vue.js")) {
        tech.frameworks.push("Vue.js".to_string());
    } else if lower.contains("angular")
        && (html.contains("angular.js") || html.contains("@angular"))
    {
        tech.frameworks.push("Angular".to_string());
    } else if lower.contains("next.js") || html.contains("_next") {
        tech.frameworks.push("Next.js".to_string());
    } else if lower.contains("nuxt") {
        tech.frameworks.push("Nuxt.js".to_string());
    }

    if lower.contains("bootstrap") {
        tech.frameworks.push("Bootstrap".to_string());
    } else if lower.contains("tailwind") {
        tech.frameworks.push("Tailwind CSS".to_string());
    }

    if lower.contains("jquery") {
        tech.libraries.push("jQuery".to_string());
    }

    // The generator meta tag is authoritative when present.
    let doc = Html::parse_document(html);
    let generator_selector = Selector::parse(r#"meta[name="generator"]"#).unwrap();
    if let Some(meta) = doc.select(&generator_selector).next() {
        let content = meta.value().attr("content").unwrap_or("").to_lowercase();
        if content.contains("wordpress") && !tech.cms.iter().any(|c| c == "WordPress") {
            tech.cms.push("WordPress".to_string());
        } else if content.contains("drupal") && !tech.cms.iter().any(|c| c == "Drupal") {
            tech.cms.push("Drupal".to_string());
        }
    }

    tech
}

/// Is the page client-side rendered? Framework markers in the markup are a
/// good-enough heuristic for deciding whether to probe SPA routes.
pub fn is_spa(html: &str) -> bool {
    let lower = html.to_lowercase();
    ["nuxt", "next.js", "vue", "react", "angular"]
        .iter()
        .any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_wordpress_from_asset_paths() {
        let tech = detect(r#"<link href="/wp-content/themes/x/style.css">"#);
        assert_eq!(tech.cms, vec!["WordPress"]);
    }

    #[test]
    fn detects_wordpress_from_generator_meta() {
        let tech = detect(r#"<meta name="generator" content="WordPress 6.4">"#);
        assert_eq!(tech.cms, vec!["WordPress"]);
    }

    #[test]
    fn detects_react_and_jquery() {
        let tech = detect(
            r#"<script src="react-dom.min.js"></script><script src="jquery.js"></script>"#,
        );
        assert_eq!(tech.frameworks, vec!["React"]);
        assert_eq!(tech.libraries, vec!["jQuery"]);
    }

    #[test]
    fn spa_detection() {
        assert!(is_spa(r#"<div id="__nuxt"></div>"#));
        assert!(is_spa(r#"<script src="react.production.min.js"></script>"#));
        assert!(!is_spa("<html><body><p>plain server page</p></body></html>"));
    }

    #[test]
    fn summary_formats() {
        assert_eq!(Technologies::default().summary(), "not detected");
        let tech = detect(r#"<link href="/wp-content/a.css"><script>bootstrap</script>"#);
        assert_eq!(tech.summary(), "WordPress, Bootstrap");
    }
}
