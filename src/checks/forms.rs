use crate::checks::{Rule, label_targets};
use crate::results::{Finding, Severity};
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Checks that form controls are labeled and that forms expose error
/// feedback (WCAG 3.3.1, 3.3.2).
pub struct FormAccessibility;

impl Rule for FormAccessibility {
    fn name(&self) -> &'static str {
        "form-accessibility"
    }

    fn inspect(&self, doc: &Html, _url: &Url) -> Vec<Finding> {
        let form_selector = Selector::parse("form").unwrap();
        let control_selector = Selector::parse("input, select, textarea").unwrap();
        let alert_selector = Selector::parse(r#"[role="alert"]"#).unwrap();
        let error_class = Regex::new(r"error|invalid").unwrap();

        let forms: Vec<_> = doc.select(&form_selector).collect();
        if forms.is_empty() {
            return Vec::new();
        }

        let labels = label_targets(doc);
        let mut unlabeled_controls = 0usize;
        let mut forms_without_errors = 0usize;
        let mut details = Vec::new();

        for (index, form) in forms.iter().enumerate() {
            let mut form_details = Vec::new();

            for control in form.select(&control_selector) {
                let value = control.value();
                let control_type = value.attr("type").unwrap_or_else(|| value.name());
                if control_type == "hidden" {
                    continue;
                }

                let labeled = value.attr("id").is_some_and(|id| labels.contains(id))
                    || value.attr("aria-label").is_some_and(|v| !v.trim().is_empty())
                    || value.attr("aria-labelledby").is_some()
                    || value.attr("title").is_some_and(|v| !v.trim().is_empty());

                if !labeled {
                    // A placeholder disappears while typing; it is not a label.
                    if value.attr("placeholder").is_some() {
                        form_details
                            .push(format!("{control_type}: placeholder only (insufficient)"));
                    } else {
                        form_details.push(format!("{control_type}: no label"));
                    }
                    unlabeled_controls += 1;
                }
            }

            let has_error_region = form.select(&alert_selector).next().is_some()
                || form_has_error_class(form, &error_class);

            if !has_error_region {
                forms_without_errors += 1;
                form_details.push("no error handling detectable".to_string());
            }

            details.extend(
                form_details
                    .iter()
                    .take(3)
                    .map(|d| format!("form {}: {}", index + 1, d)),
            );
        }

        let total = unlabeled_controls + forms_without_errors;
        if total == 0 {
            return Vec::new();
        }

        let severity = if unlabeled_controls > 0 {
            Severity::Mandatory
        } else {
            Severity::ShouldDo
        };

        details.truncate(8);
        details.push("Fix: attach <label for=\"email\">Email</label> to each control".to_string());
        vec![Finding {
            issue_type: "form-accessibility".to_string(),
            wcag_criterion: "3.3.1 Error Identification, 3.3.2 Labels or Instructions".to_string(),
            severity,
            description: format!(
                "{unlabeled_controls} unlabeled controls, {forms_without_errors} forms without error handling"
            ),
            details,
            count: total,
            effort_hours: unlabeled_controls as f64 * 0.15 + forms_without_errors as f64 * 0.75,
            impact: "Critical - forms are unusable for assistive-technology users".to_string(),
        }]
    }
}

/// Look for error/invalid styling hooks anywhere inside the form.
fn form_has_error_class(form: &scraper::ElementRef, error_class: &Regex) -> bool {
    form.descendants()
        .filter_map(scraper::ElementRef::wrap)
        .any(|el| el.value().attr("class").is_some_and(|c| error_class.is_match(c)))
}
