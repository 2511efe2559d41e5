use clap::Parser;
use pagecheck::AuditConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pagecheck")]
#[command(about = "Accessibility audit for a website, starting from a seed URL")]
#[command(version)]
pub struct Args {
    /// Seed URL the audit starts from (https is assumed when omitted)
    pub url: String,

    /// Maximum number of pages to analyze (default 10)
    #[arg(short, long)]
    pub max_pages: Option<usize>,

    /// Analyze every reachable same-origin page, ignoring --max-pages
    #[arg(long)]
    pub analyze_all: bool,

    /// Delay between page requests in milliseconds (default 500)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// WebDriver endpoint for script-executing renders (e.g. http://localhost:9515)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Write the full JSON report to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Load configuration from a JSON file (CLI flags override it)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Build the run configuration: file-provided values first, then only
    /// the flags the user actually passed on top.
    pub fn into_config(self) -> Result<AuditConfig, pagecheck::AuditError> {
        let mut config = match &self.config {
            Some(path) => AuditConfig::from_file(path)?,
            None => AuditConfig::new(&self.url),
        };

        config.seed_url = self.url;
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if self.analyze_all {
            config.analyze_all = true;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        if self.webdriver_url.is_some() {
            config.webdriver_url = self.webdriver_url;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        Ok(config)
    }
}
