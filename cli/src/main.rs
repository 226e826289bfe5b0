//! CLI entrypoint for llm-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{RunCouncilInput, RunCouncilUseCase};
use council_infrastructure::{ConfigLoader, OpenRouterGateway};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod progress;

use cli::Cli;
use progress::ConsoleProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?
    };

    let question = cli.question.join(" ");
    if question.trim().is_empty() {
        bail!("a question is required");
    }

    let council = config.council_config().context("invalid configuration")?;
    let timeout = config.request_timeout().context("invalid configuration")?;

    // === Dependency Injection ===
    let gateway = Arc::new(OpenRouterGateway::from_env(timeout)?);

    // Ctrl-C aborts in-flight stages instead of killing mid-write
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let mut use_case = RunCouncilUseCase::new(gateway)
        .with_retry_policy(config.retry_policy())
        .with_cancellation(cancel);
    if let Some(seed) = cli.seed {
        use_case = use_case.with_seed(seed);
    }

    let mut input = RunCouncilInput::new(question, council);
    if cli.fast || config.behavior.fast {
        input = input.fast();
    }

    info!(fast = input.fast, "convening council");

    let result = if cli.quiet {
        use_case.execute(input).await
    } else {
        use_case.execute_with_progress(input, &ConsoleProgress).await
    };

    match result {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(error) => {
            for failure in error.failures() {
                eprintln!("  {}: {}", failure.model, failure.error);
            }
            Err(error.into())
        }
    }
}
