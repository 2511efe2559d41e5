use crate::consolidate::ConsolidatedIssue;
use crate::discovery::DiscoveryStats;
use crate::results::{PageRecord, Severity};
use crate::tech::Technologies;
use serde::Serialize;
use std::path::Path;

/// Serializable run report: one document per audited site.
#[derive(Debug, Serialize)]
pub struct AuditReport<'a> {
    pub site: &'a str,
    pub generated_at_unix: u64,
    pub technologies: &'a Technologies,
    pub discovery: &'a DiscoveryStats,
    pub pages: &'a [PageRecord],
    pub issues: &'a [ConsolidatedIssue],
    pub warnings: &'a [String],
    pub totals: Totals,
}

#[derive(Debug, Serialize)]
pub struct Totals {
    pub pages_analyzed: usize,
    pub pages_failed: usize,
    pub issue_types: usize,
    pub occurrences: usize,
    pub effort_hours: f64,
    pub mandatory: usize,
    pub should_do: usize,
    pub nice_to_have: usize,
}

impl<'a> AuditReport<'a> {
    pub fn new(
        site: &'a str,
        technologies: &'a Technologies,
        discovery: &'a DiscoveryStats,
        pages: &'a [PageRecord],
        issues: &'a [ConsolidatedIssue],
        warnings: &'a [String],
    ) -> Self {
        let totals = Totals::from_parts(pages, issues);
        Self {
            site,
            generated_at_unix: unix_now(),
            technologies,
            discovery,
            pages,
            issues,
            warnings,
            totals,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<(), crate::error::AuditError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Human-readable run summary on stdout.
    pub fn print_summary(&self) {
        let t = &self.totals;

        println!();
        println!("Accessibility audit for {}", self.site);
        println!("{}", "=".repeat(60));
        println!(
            "Pages analyzed: {} ({} failed to load)",
            t.pages_analyzed, t.pages_failed
        );
        println!("Technology: {}", self.technologies.summary());
        println!(
            "Issue types: {} ({} total occurrences)",
            t.issue_types, t.occurrences
        );
        println!("Estimated effort: {:.1}h", t.effort_hours);
        println!();
        println!("  {:<14} {}", Severity::Mandatory.to_string(), t.mandatory);
        println!("  {:<14} {}", Severity::ShouldDo.to_string(), t.should_do);
        println!(
            "  {:<14} {}",
            Severity::NiceToHave.to_string(),
            t.nice_to_have
        );
        println!();

        for issue in self.issues {
            println!(
                "[{}] {} ({} on {} pages, ~{:.1}h)",
                issue.severity,
                issue.description,
                issue.count,
                issue.pages.len(),
                issue.effort_hours
            );
        }
        if !self.issues.is_empty() {
            println!();
        }

        println!("Risk level: {}", risk_level(t.mandatory));
    }
}

impl Totals {
    fn from_parts(pages: &[PageRecord], issues: &[ConsolidatedIssue]) -> Self {
        let pages_analyzed = pages.iter().filter(|p| p.status.is_analyzed()).count();
        let count_severity = |severity: Severity| {
            issues
                .iter()
                .filter(|i| i.severity == severity)
                .map(|i| i.count)
                .sum()
        };
        Self {
            pages_analyzed,
            pages_failed: pages.len() - pages_analyzed,
            issue_types: issues.len(),
            occurrences: issues.iter().map(|i| i.count).sum(),
            effort_hours: issues.iter().map(|i| i.effort_hours).sum(),
            mandatory: count_severity(Severity::Mandatory),
            should_do: count_severity(Severity::ShouldDo),
            nice_to_have: count_severity(Severity::NiceToHave),
        }
    }
}

fn risk_level(mandatory_occurrences: usize) -> &'static str {
    match mandatory_occurrences {
        0 => "LOW",
        1..=5 => "MEDIUM",
        _ => "HIGH",
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
