//! ontogent command line interface
//!
//! Resolve anatomical descriptions to UBERON terms.
//!
//! # Usage
//!
//! ```bash
//! # One query
//! ontogent "embryonic heart"
//!
//! # Interactive session (quit, exit or q to leave)
//! ontogent --log-level debug --log-file ontogent.log
//!
//! # Machine-readable output
//! ontogent --format json "liver"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use ontogent::{agentic, logging, ontology, ResolutionPipeline, SearchResult, Settings};

const MAX_OTHER_MATCHES: usize = 4;

#[derive(Parser)]
#[command(name = "ontogent")]
#[command(version)]
#[command(about = "Find the UBERON term that best matches an anatomical description")]
#[command(long_about = None)]
struct Cli {
    /// Description to resolve; starts an interactive session when omitted
    query: Option<String>,

    /// Log verbosity
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "pretty", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_level.into(), cli.log_file.as_deref()) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        return ExitCode::FAILURE;
    }

    let pipeline = match build_pipeline().await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to start");
            eprintln!("{}: {:#}", "error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match cli.query {
        Some(query) => {
            let result = pipeline.find_term(&query).await;
            print_result(&result, cli.format);
        }
        None => interactive(&pipeline, cli.format).await,
    }

    ExitCode::SUCCESS
}

async fn build_pipeline() -> Result<ResolutionPipeline> {
    let settings = Settings::from_env()?;
    let llm = agentic::create_llm_client(&settings)?;
    let search = ontology::connect(&settings).await?;
    Ok(ResolutionPipeline::new(llm, search).with_max_results(settings.ontology.max_results))
}

async fn interactive(pipeline: &ResolutionPipeline, format: OutputFormat) {
    println!("{}", "UBERON term finder".bold());
    println!("Describe an anatomical structure, or type 'quit' to exit.\n");

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{}: cannot start line editor: {}", "error".red().bold(), e);
            return;
        }
    };

    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                break;
            }
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        let _ = editor.add_history_entry(query);

        let result = pipeline.find_term(query).await;
        print_result(&result, format);
        println!();
    }

    println!("Goodbye!");
}

fn print_result(result: &SearchResult, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}: JSON serialization failed: {}", "error".red().bold(), e),
        },
        OutputFormat::Pretty => print_pretty(result),
    }
}

fn print_pretty(result: &SearchResult) {
    println!("{} {}", "Query:".bold(), result.query());
    println!("{} {}", "Matches:".bold(), result.total_matches());

    let Some(best) = result.best_match() else {
        if result.total_matches() == 0 {
            println!(
                "{}",
                "No matching terms found. Try a broader or simpler description.".yellow()
            );
        } else {
            println!(
                "{}",
                "Several candidates found but none stood out:".yellow()
            );
            for term in result.matches().iter().take(MAX_OTHER_MATCHES + 1) {
                println!("  - {} {}", term.id.cyan(), term.label);
            }
        }
        return;
    };

    println!("\n{}", "Best match".green().bold());
    println!("  {} {}", best.id.cyan(), best.label.bold());
    if !best.definition.is_empty() {
        println!("  {} {}", "Definition:".dimmed(), best.definition);
    }
    println!("  {} {:.2}", "Confidence:".dimmed(), result.confidence());
    if !result.reasoning().is_empty() {
        println!("  {} {}", "Reasoning:".dimmed(), result.reasoning());
    }
    if !best.synonyms.is_empty() {
        println!("  {} {}", "Synonyms:".dimmed(), best.synonyms.join(", "));
    }
    if !best.url.is_empty() {
        println!("  {} {}", "URL:".dimmed(), best.url);
    }

    let others: Vec<_> = result
        .matches()
        .iter()
        .filter(|t| t.id != best.id)
        .take(MAX_OTHER_MATCHES)
        .collect();
    if !others.is_empty() {
        println!("\n{}", "Other matches".bold());
        for term in others {
            println!("  - {} {}", term.id.cyan(), term.label);
        }
    }
}
