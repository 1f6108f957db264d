// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pk: the pipeline execution kernel's command-line surface. Loads a
//! YAML pipeline definition, validates it against policy, and runs it
//! (or just validates, or explains a diagnostic), mapping the outcome
//! to the external interface's exit-code contract.

mod commands;
mod logging;
mod settings;

use clap::{Parser, Subcommand};
use commands::{explain, run, validate};
use settings::{CliSettings, LogFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pk", version, about = "A declarative CI pipeline execution kernel")]
struct Cli {
    /// Settings file overriding policy ceilings and log format
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the configured log format
    #[arg(long = "log-format", global = true, value_enum)]
    log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, validate, and execute a pipeline definition
    Run(run::RunArgs),
    /// Load and validate a pipeline definition without executing it
    Validate(validate::ValidateArgs),
    /// Explain the diagnostic at a source position
    Explain(explain::ExplainArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let settings = match CliSettings::from_sources(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(4);
        }
    };
    let log_format = match cli.log_format {
        Some(LogFormatArg::Pretty) => LogFormat::Pretty,
        Some(LogFormatArg::Json) => LogFormat::Json,
        None => settings.log_format,
    };
    logging::init(log_format);

    let outcome = match cli.command {
        Commands::Run(args) => run::handle(args, &settings).await,
        Commands::Validate(args) => validate::handle(args, &settings),
        Commands::Explain(args) => explain::handle(args),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", format_error(&e));
            let code = e.downcast_ref::<pk_core::KernelError>().map_or(4, pk_core::KernelError::exit_code);
            std::process::exit(code);
        }
    }
}

/// Format an anyhow error, deduplicating the chain when the top-level
/// message already contains every cause (the common case for
/// `thiserror` variants using `#[from]`).
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err.chain().skip(1).all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }
    let mut buf = top;
    for cause in err.chain().skip(1) {
        buf.push_str(&format!("\ncaused by: {cause}"));
    }
    buf
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
