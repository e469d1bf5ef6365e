use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use webharvest::cli::commands::{
    handle_config, handle_get, handle_harvest, handle_search, handle_status,
};
use webharvest::cli::{Cli, Commands};
use webharvest::models::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("webharvest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resolved = Config::load().unwrap_or_default();
    let format = cli.format.unwrap_or(resolved.search.default_format);

    tokio::select! {
        result = run_command(cli.command, format) => {
            result?;
        }
        _ = shutdown_signal() => {
            eprintln!("\nReceived shutdown signal, exiting...");
        }
    }

    Ok(())
}

async fn run_command(command: Commands, format: webharvest::models::OutputFormat) -> Result<()> {
    match command {
        Commands::Harvest(args) => {
            handle_harvest(args, format).await?;
        }
        Commands::Search(args) => {
            handle_search(args, format).await?;
        }
        Commands::Get(args) => {
            handle_get(args, format).await?;
        }
        Commands::Status => {
            handle_status(format).await?;
        }
        Commands::Config(cmd) => {
            handle_config(cmd, format).await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
