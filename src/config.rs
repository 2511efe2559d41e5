use crate::error::AuditError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for an audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// URL the audit starts from. Optional in config files because the CLI
    /// positional argument overrides it.
    #[serde(default)]
    pub seed_url: String,

    /// Maximum number of pages admitted for analysis (ignored if analyze_all)
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Analyze every same-origin page reachable from the seed
    #[serde(default)]
    pub analyze_all: bool,

    /// Language codes recognized as locale prefixes in URL paths
    #[serde(default = "default_language_codes")]
    pub language_codes: Vec<String>,

    /// Treat a single-segment path like `/en` as a locale prefix rather than
    /// content. Off by default because such paths are ambiguous.
    #[serde(default)]
    pub strip_root_language: bool,

    /// Cap on accumulated fix-effort hours per issue type across the site.
    /// Highly repeated issues are usually fixed as a pattern, so raw
    /// per-occurrence summation overstates cost.
    #[serde(default = "default_effort_cap")]
    pub effort_cap_hours: f64,

    /// Timeout for page fetches during discovery and analysis, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Timeout for sitemap fetches and SPA existence probes, in seconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Timeout for a full page render, in seconds
    #[serde(default = "default_render_timeout")]
    pub render_timeout_secs: u64,

    /// Delay between page analyses, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// WebDriver endpoint for script-executing page renders. When unset,
    /// pages are rendered from the raw HTTP response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webdriver_url: Option<String>,

    /// Path the JSON report is written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl AuditConfig {
    /// Create a configuration with default values
    pub fn new(seed_url: &str) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            max_pages: default_max_pages(),
            analyze_all: false,
            language_codes: default_language_codes(),
            strip_root_language: false,
            effort_cap_hours: default_effort_cap(),
            fetch_timeout_secs: default_fetch_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            render_timeout_secs: default_render_timeout(),
            delay_ms: default_delay_ms(),
            webdriver_url: None,
            output: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AuditError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Default value for max_pages
fn default_max_pages() -> usize {
    10
}

/// Default per-issue-type effort cap in hours
fn default_effort_cap() -> f64 {
    8.0
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_render_timeout() -> u64 {
    45
}

fn default_delay_ms() -> u64 {
    500
}

/// Built-in set of language codes recognized as URL locale prefixes
fn default_language_codes() -> Vec<String> {
    [
        "en", "de", "fr", "es", "it", "nl", "pt", "ru", "zh", "ja", "ko", "ar", "pl", "cz", "cs",
        "sk", "hu", "ro", "bg", "hr", "sl", "fi", "sv", "no", "da", "tr", "el", "he", "th", "vi",
        "uk", "lt", "lv", "et",
    ]
    .iter()
    .map(|code| code.to_string())
    .collect()
}
