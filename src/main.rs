use clap::Parser;
use pagecheck::run_audit;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    ::log::info!("Starting accessibility audit for {}", config.seed_url);
    if config.webdriver_url.is_some() {
        println!("Note: script-executing renders require a WebDriver server (e.g., ChromeDriver).");
    }

    let start_time = std::time::Instant::now();
    let outcome = match run_audit(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            ::log::error!("Audit failed: {}", e);
            std::process::exit(1);
        }
    };

    let report = outcome.report();
    report.print_summary();

    if let Some(path) = &config.output {
        match report.write_json(path) {
            Ok(()) => println!("Report written to {}", path.display()),
            Err(e) => {
                ::log::error!("Failed to write report: {}", e);
                std::process::exit(1);
            }
        }
    }

    ::log::info!(
        "Audit complete - analyzed {} pages in {:.2} seconds",
        outcome.pages.len(),
        start_time.elapsed().as_secs_f64()
    );
}
