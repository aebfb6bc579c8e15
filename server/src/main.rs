//! COMPLYR policy-evaluate service CLI
//!
//! Usage:
//!   complyr serve --config complyr.toml
//!   complyr evaluate request.json
//!   complyr scenarios

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use complyr_contracts::error::ComplyrResult;
use complyr_policy::RuleEngine;
use complyr_server::{cli, config::DEFAULT_LOG_FILTER, scenarios, AppState, ServerConfig};

// ── CLI definition ────────────────────────────────────────────────────────────

/// COMPLYR: fail-closed policy evaluation for AI tool usage.
#[derive(Parser)]
#[command(name = "complyr", version, about = "COMPLYR policy-evaluate service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service.
    Serve {
        /// TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override `server.listen`.
        #[arg(long)]
        listen: Option<String>,
    },
    /// Evaluate one request body read from a file and print the verdict.
    Evaluate {
        /// JSON file holding `{ "event": ..., "rules": [...] }`.
        request: PathBuf,
    },
    /// Run the built-in reference scenarios.
    Scenarios,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve { config, listen } => run_serve(config.as_deref(), listen).await,
        Command::Evaluate { request } => {
            init_logging("warn");
            run_evaluate(&request)
        }
        Command::Scenarios => {
            init_logging("warn");
            Ok(run_scenarios())
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("complyr: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_logging(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .compact()
        .init();
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn run_serve(config_path: Option<&Path>, listen: Option<String>) -> ComplyrResult<ExitCode> {
    let mut config = match config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = listen {
        config.server.listen = listen;
    }

    init_logging(if config.logging.filter.is_empty() {
        DEFAULT_LOG_FILTER
    } else {
        &config.logging.filter
    });

    let state = Arc::new(AppState::from_config(&config)?);
    complyr_server::serve(&config.server.listen, state, &config.server).await?;
    Ok(ExitCode::SUCCESS)
}

fn run_evaluate(path: &Path) -> ComplyrResult<ExitCode> {
    let outcome = cli::evaluate_file(
        path,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;
    Ok(outcome.into())
}

fn run_scenarios() -> ExitCode {
    let ts = chrono::Utc::now().to_rfc3339();
    let rules = scenarios::reference_rules();
    let outcomes = scenarios::run(&RuleEngine::new(), &rules, scenarios::reference_scenarios(&ts));

    println!();
    println!("COMPLYR reference scenarios");
    println!("===========================");
    for outcome in &outcomes {
        let mark = if outcome.passed() { "PASS" } else { "FAIL" };
        println!(
            "  [{mark}] {:<40} expected {:<15} got {:<15} rule {}",
            outcome.name,
            outcome.expected.as_str(),
            outcome.verdict.status.as_str(),
            outcome.verdict.rule_id.as_deref().unwrap_or("-"),
        );
    }
    println!();

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    if failed == 0 {
        println!("All {} scenarios produced their expected status.", outcomes.len());
        ExitCode::SUCCESS
    } else {
        println!("{failed} of {} scenarios failed.", outcomes.len());
        ExitCode::FAILURE
    }
}
