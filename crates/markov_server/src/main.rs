//! Markov Server
//!
//! REST API server for credit-transition analysis.

use clap::Parser;
use markov_server::config::{build_config, CliArgs as ConfigCliArgs, LogLevel};
use markov_server::server::Server;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Markov Server - REST API for credit-transition analysis
#[derive(Parser, Debug)]
#[command(name = "markov_server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level
    #[arg(long, value_enum, ignore_case = true)]
    log_level: Option<LogLevel>,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cli_args: ConfigCliArgs = args.into();
    let config = build_config(&cli_args)?;

    init_tracing(&config.log_filter());

    tracing::info!("Markov Server v{}", markov_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        environment = %config.environment,
        stationary_tolerance = config.stationary_tolerance,
        stationary_max_iterations = config.stationary_max_iterations,
        "Server configuration loaded"
    );

    let server = Server::new(config);
    server.run().await?;

    Ok(())
}
