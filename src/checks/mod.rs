pub mod alt_text;
pub mod aria;
pub mod content;
pub mod forms;
pub mod headings;
pub mod page_basics;

use crate::results::Finding;
use scraper::html::Html;
use std::collections::HashSet;
use url::Url;

/// One accessibility rule: a stateless predicate over a parsed document.
///
/// New checks register through `default_rules` (or a custom rule list on the
/// analyzer) without touching the orchestration code.
pub trait Rule {
    fn name(&self) -> &'static str;

    fn inspect(&self, doc: &Html, url: &Url) -> Vec<Finding>;
}

/// The built-in rule catalog
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(alt_text::AltText),
        Box::new(aria::AriaLabels),
        Box::new(headings::HeadingStructure),
        Box::new(forms::FormAccessibility),
        Box::new(page_basics::PageBasics),
        Box::new(content::ContentExtras),
    ]
}

/// Shorten a string for detail output
pub(crate) fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let prefix: String = value.chars().take(max).collect();
        format!("{prefix}...")
    }
}

/// Collect the `for` targets of every label in the document, for fast
/// "does this control have a label" lookups.
pub(crate) fn label_targets(doc: &Html) -> HashSet<String> {
    let selector = scraper::Selector::parse("label[for]").unwrap();
    doc.select(&selector)
        .filter_map(|label| label.value().attr("for"))
        .map(|target| target.to_string())
        .collect()
}
