use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use stepgate::notify::QueueEntry;
use stepgate::validation::{OutputValidator, Severity, ValidationResult, Validator};
use stepgate::gate::check_range;
use stepgate::{Config, Notifier};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stepgate")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("stepgate.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Ok => severity.as_str().green(),
        Severity::Warning => severity.as_str().yellow(),
        Severity::Critical => severity.as_str().red().bold(),
    }
}

fn print_result(result: &ValidationResult) {
    println!("{} step {}", severity_label(result.severity), result.step);
    for issue in &result.issues {
        println!("  {} {}", severity_label(issue.severity), issue.message);
    }
}

fn print_queue(queue: &[QueueEntry]) {
    for entry in queue {
        let stamp = entry.timestamp.format("%H:%M:%S").to_string();
        let kind = match entry.event.kind() {
            "critical_stop" => entry.event.kind().red().bold(),
            "auto_continue" | "pipeline_complete" => entry.event.kind().green(),
            "question" => entry.event.kind().yellow(),
            _ => entry.event.kind().cyan(),
        };
        println!("{} [{}] {}", stamp.dimmed(), kind, entry.message);
    }
}

async fn handle_validate_command(step: u32, config: &Config) -> Result<()> {
    info!("Validating output of step {}", step);
    let validator = OutputValidator::new(config.validation_policy());
    let result = validator
        .validate(step, &config.project_root, &config.output_map())
        .await;
    print_result(&result);
    if !result.can_continue {
        eyre::bail!("Step {} output failed validation", step);
    }
    Ok(())
}

async fn handle_check_command(from: u32, to: Option<u32>, config: &Config, verbose: bool) -> Result<()> {
    let notifier = Notifier::from_config(&config.notify);
    let outcome = check_range(config, notifier, from, to)
        .await
        .context("Failed to gate step range")?;

    if verbose {
        for record in outcome.controller.results() {
            print_result(&record.result);
        }
    }
    print_queue(outcome.controller.notifier().queue());

    if let Some(step) = outcome.halted_at {
        eyre::bail!("Pipeline halted at step {}", step);
    }
    println!("{}", "All steps passed".green());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Validate { step } => handle_validate_command(*step, config).await,
        Commands::Check { from, to } => handle_check_command(*from, *to, config, cli.is_verbose()).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
