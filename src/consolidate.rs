use crate::results::{PageRecord, Severity};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Cross-page merged, deduplicated, prioritized issue record.
///
/// Exactly one consolidated issue exists per distinct issue-type identifier
/// across the whole run.
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidatedIssue {
    pub issue_type: String,
    pub severity: Severity,
    pub wcag_criterion: String,
    pub description: String,
    pub impact: String,

    /// Total occurrences across all pages
    pub count: usize,

    /// Pages on which the issue occurred (set semantics)
    pub pages: BTreeSet<String>,

    /// Accumulated fix effort, capped per issue type: repeated issues are
    /// fixed as a pattern, so raw summation would overstate the cost.
    pub effort_hours: f64,

    pub details: Vec<String>,
}

/// Maximum unique detail lines kept per consolidated issue
const MAX_DETAILS: usize = 8;

/// Folds per-page findings into one deduplicated issue set.
///
/// Designed as a sequential fold over independently collected page records,
/// so no shared-mutation discipline is needed even if page analysis is ever
/// parallelized.
pub struct Consolidator {
    issues: HashMap<String, ConsolidatedIssue>,
    warnings: Vec<String>,
    effort_cap_hours: f64,
}

impl Consolidator {
    pub fn new(effort_cap_hours: f64) -> Self {
        Self {
            issues: HashMap::new(),
            warnings: Vec::new(),
            effort_cap_hours,
        }
    }

    /// Fold one page's findings into the accumulator.
    pub fn fold(&mut self, record: &PageRecord) {
        for finding in &record.findings {
            let issue = self
                .issues
                .entry(finding.issue_type.clone())
                .or_insert_with(|| ConsolidatedIssue {
                    issue_type: finding.issue_type.clone(),
                    severity: finding.severity,
                    wcag_criterion: finding.wcag_criterion.clone(),
                    description: finding.description.clone(),
                    impact: finding.impact.clone(),
                    count: 0,
                    pages: BTreeSet::new(),
                    effort_hours: 0.0,
                    details: Vec::new(),
                });

            // First-seen severity and criterion win; a mismatch means a rule
            // implementation is inconsistent and deserves a warning, not a
            // silent average.
            if issue.severity != finding.severity {
                let warning = format!(
                    "rule '{}' reported severity {} on {} but was first seen as {}",
                    finding.issue_type, finding.severity, record.url, issue.severity
                );
                ::log::warn!("{}", warning);
                self.warnings.push(warning);
            }
            if issue.wcag_criterion != finding.wcag_criterion {
                let warning = format!(
                    "rule '{}' reported criterion '{}' on {} but was first seen as '{}'",
                    finding.issue_type, finding.wcag_criterion, record.url, issue.wcag_criterion
                );
                ::log::warn!("{}", warning);
                self.warnings.push(warning);
            }

            issue.count += finding.count;
            issue.pages.insert(record.url.clone());
            issue.effort_hours =
                (issue.effort_hours + finding.effort_hours).min(self.effort_cap_hours);

            for detail in &finding.details {
                if issue.details.len() >= MAX_DETAILS {
                    break;
                }
                if !issue.details.contains(detail) {
                    issue.details.push(detail.clone());
                }
            }
        }
    }

    /// Finish the fold: issues ordered by severity rank, then descending
    /// occurrence count, then key for a stable tie-break.
    pub fn finish(self) -> (Vec<ConsolidatedIssue>, Vec<String>) {
        let mut issues: Vec<ConsolidatedIssue> = self.issues.into_values().collect();
        issues.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then(b.count.cmp(&a.count))
                .then(a.issue_type.cmp(&b.issue_type))
        });
        (issues, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{FetchStatus, Finding};

    fn finding(issue_type: &str, severity: Severity, count: usize, effort: f64) -> Finding {
        Finding {
            issue_type: issue_type.to_string(),
            wcag_criterion: "1.1.1 Non-text Content".to_string(),
            severity,
            description: format!("{count} occurrences of {issue_type}"),
            details: vec![format!("detail for {issue_type}")],
            count,
            effort_hours: effort,
            impact: "test impact".to_string(),
        }
    }

    fn record(url: &str, findings: Vec<Finding>) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            label: url.to_string(),
            status: FetchStatus::Analyzed,
            findings,
        }
    }

    #[test]
    fn occurrences_sum_and_pages_deduplicate() {
        let mut consolidator = Consolidator::new(8.0);
        consolidator.fold(&record(
            "https://example.com/",
            vec![finding("missing-alt", Severity::Mandatory, 3, 0.45)],
        ));
        consolidator.fold(&record(
            "https://example.com/about",
            vec![finding("missing-alt", Severity::Mandatory, 2, 0.3)],
        ));

        let (issues, warnings) = consolidator.finish();
        assert!(warnings.is_empty());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].count, 5);
        assert_eq!(issues[0].pages.len(), 2);
    }

    #[test]
    fn same_page_twice_counts_once_in_page_spread() {
        let mut consolidator = Consolidator::new(8.0);
        consolidator.fold(&record(
            "https://example.com/",
            vec![
                finding("missing-alt", Severity::Mandatory, 1, 0.15),
                finding("missing-alt", Severity::Mandatory, 1, 0.15),
            ],
        ));

        let (issues, _) = consolidator.finish();
        assert_eq!(issues[0].count, 2);
        assert_eq!(issues[0].pages.len(), 1);
    }

    #[test]
    fn effort_is_capped_per_issue_type() {
        let mut consolidator = Consolidator::new(5.0);
        for i in 0..4 {
            consolidator.fold(&record(
                &format!("https://example.com/{i}"),
                vec![finding("missing-alt", Severity::Mandatory, 20, 3.0)],
            ));
        }

        let (issues, _) = consolidator.finish();
        // Raw sum would be 12.0.
        assert_eq!(issues[0].effort_hours, 5.0);
    }

    #[test]
    fn severity_mismatch_warns_and_keeps_first_seen() {
        let mut consolidator = Consolidator::new(8.0);
        consolidator.fold(&record(
            "https://example.com/",
            vec![finding("flaky-rule", Severity::Mandatory, 1, 0.1)],
        ));
        consolidator.fold(&record(
            "https://example.com/about",
            vec![finding("flaky-rule", Severity::NiceToHave, 1, 0.1)],
        ));

        let (issues, warnings) = consolidator.finish();
        assert_eq!(issues[0].severity, Severity::Mandatory);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("flaky-rule"));
    }

    #[test]
    fn report_order_is_severity_then_descending_count() {
        let mut consolidator = Consolidator::new(8.0);
        consolidator.fold(&record(
            "https://example.com/",
            vec![
                finding("nice", Severity::NiceToHave, 50, 0.1),
                finding("small-mandatory", Severity::Mandatory, 1, 0.1),
                finding("big-mandatory", Severity::Mandatory, 9, 0.1),
                finding("should", Severity::ShouldDo, 2, 0.1),
            ],
        ));

        let (issues, _) = consolidator.finish();
        let order: Vec<&str> = issues.iter().map(|i| i.issue_type.as_str()).collect();
        assert_eq!(
            order,
            vec!["big-mandatory", "small-mandatory", "should", "nice"]
        );
    }

    #[test]
    fn details_stay_unique_and_bounded() {
        let mut consolidator = Consolidator::new(8.0);
        for i in 0..20 {
            let mut f = finding("busy", Severity::ShouldDo, 1, 0.1);
            f.details = vec![format!("detail {i}"), "repeated".to_string()];
            consolidator.fold(&record(&format!("https://example.com/{i}"), vec![f]));
        }

        let (issues, _) = consolidator.finish();
        assert!(issues[0].details.len() <= MAX_DETAILS);
        let repeated = issues[0].details.iter().filter(|d| *d == "repeated").count();
        assert_eq!(repeated, 1);
    }
}
