//! OLS API health check
//!
//! Diagnoses connectivity with the EBI Ontology Lookup Service. Exits 0 when
//! the API is healthy and 1 otherwise.
//!
//! ```bash
//! check_api --timeout 5 --format json
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use ontogent::config::OntologySettings;
use ontogent::logging;
use ontogent::ontology::check_api_health;

#[derive(Parser)]
#[command(name = "check_api")]
#[command(version)]
#[command(about = "Check the EBI OLS4 API status")]
struct Cli {
    /// Timeout for API requests in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = logging::init(tracing::Level::WARN, None) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        return ExitCode::FAILURE;
    }

    let ontology = match OntologySettings::from_env() {
        Ok(ontology) => ontology,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Checking EBI OLS4 API health...");
    let report = check_api_health(
        &ontology.base_url,
        &ontology.ontology,
        Duration::from_secs(cli.timeout),
    )
    .await;

    match cli.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}: JSON serialization failed: {}", "error".red().bold(), e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Text => println!("{}", report),
    }

    if report.api_healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
