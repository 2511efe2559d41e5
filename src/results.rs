use serde::{Deserialize, Serialize};

/// Severity class of a finding, ordered from most to least urgent.
///
/// The variant order is the report order: `Mandatory` sorts before
/// `ShouldDo`, which sorts before `NiceToHave`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Mandatory,
    ShouldDo,
    NiceToHave,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Mandatory => "MANDATORY",
            Severity::ShouldDo => "SHOULD DO",
            Severity::NiceToHave => "NICE TO HAVE",
        };
        f.write_str(label)
    }
}

/// A single problem instance detected on one page.
///
/// A finding may represent multiple occurrences of the same defect on that
/// page (e.g. "3 images without alt text"), carried in `count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Issue-type identifier, the consolidation key (e.g. "missing-alt-text").
    pub issue_type: String,

    /// WCAG success criterion reference (e.g. "1.1.1 Non-text Content").
    pub wcag_criterion: String,

    pub severity: Severity,

    /// Human-readable description of the problem on this page.
    pub description: String,

    /// Contextual detail, e.g. offending element selectors or sources.
    pub details: Vec<String>,

    /// Number of occurrences this finding represents on the page.
    pub count: usize,

    /// Estimated fix effort for this page's occurrences, in hours.
    pub effort_hours: f64,

    /// What the problem means for affected users.
    pub impact: String,
}

/// Outcome of fetching and rendering a page for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchStatus {
    Analyzed,
    Failed { reason: String },
}

impl FetchStatus {
    pub fn is_analyzed(&self) -> bool {
        matches!(self, FetchStatus::Analyzed)
    }
}

/// One analyzed page: its canonical URL, display label, fetch status and the
/// raw findings produced by the rule registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,

    /// Display label, e.g. "Homepage" for the root path.
    pub label: String,

    pub status: FetchStatus,

    pub findings: Vec<Finding>,
}
