//! loadwatch CLI entry point

mod cli;
mod display;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use loadwatch_config::LoadwatchConfig;
use loadwatch_core::{LoadTestController, MetricsWatcher, RunStatus, StressEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = loadwatch_config::load_config(cli.config.as_deref())
        .context("failed to load configuration")?;

    init_tracing(&config);

    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
        config
            .validate_all()
            .context("invalid --base-url override")?;
    }

    match cli.command {
        Commands::Metrics => run_metrics(&config).await,
        Commands::Stress { api_key } => {
            if let Some(key) = api_key {
                config.auth.api_key = key;
            }
            run_stress(&config).await
        }
        Commands::Config => {
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
    }
}

/// RUST_LOG wins; otherwise the configured level applies
fn init_tracing(config: &LoadwatchConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run_metrics(config: &LoadwatchConfig) -> anyhow::Result<()> {
    let mut watcher = MetricsWatcher::connect(config)
        .await
        .context("could not subscribe to the metrics feed")?;
    info!(url = %config.server.metrics_url(), "following metrics feed (Ctrl-C to exit)");

    loop {
        let snapshot = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            snapshot = watcher.next_snapshot() => snapshot,
        };

        match snapshot {
            Some(snapshot) => println!(
                "[{}] {}",
                Utc::now().format("%H:%M:%S"),
                display::render_snapshot(&snapshot)
            ),
            None => {
                if let Some(reason) = watcher.last_error() {
                    bail!("metrics feed dropped: {}", reason);
                }
                break;
            }
        }
    }

    watcher.close();
    Ok(())
}

async fn run_stress(config: &LoadwatchConfig) -> anyhow::Result<()> {
    let mut controller = LoadTestController::new(config);

    println!("Initializing stress test...");
    if controller.start().await.is_err() {
        let advisory = controller
            .run()
            .error_message()
            .unwrap_or("could not start the stress test")
            .to_string();
        bail!(advisory);
    }

    while controller.status() == RunStatus::Running {
        let (event, interrupted) = tokio::select! {
            _ = tokio::signal::ctrl_c() => (None, true),
            event = controller.next_transition() => (event, false),
        };

        if interrupted {
            controller.reset();
            println!("Test stopped.");
            return Ok(());
        }

        match event {
            Some(StressEvent::Output(line)) => println!("{}", line),
            Some(StressEvent::Done(line)) => {
                if let Some(line) = line {
                    println!("{}", line);
                }
                println!("Test finished.");
                return Ok(());
            }
            Some(StressEvent::Failed(message)) => bail!("stress test failed: {}", message),
            Some(StressEvent::Rejected) => {
                let advisory = controller
                    .run()
                    .error_message()
                    .unwrap_or(loadwatch_core::REJECTION_ADVISORY)
                    .to_string();
                bail!(advisory);
            }
            None => return Ok(()),
        }
    }

    Ok(())
}
