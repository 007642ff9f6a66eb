//! telemetry-synth server.
//!
//! ```text
//!   synth-cli / HTTP client
//!          │
//!          ▼
//!   ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!   │ http (axum)  │────▶│ control session│────▶│ scheduler run    │
//!   └──────────────┘     └───────┬────────┘     │  (tokio task)    │
//!                                │              └────────┬─────────┘
//!                                ▼                       ▼
//!                        ┌───────────────┐      ┌──────────────────┐
//!                        │ sink (ES/mem) │◀─────│ synth generator  │
//!                        └───────────────┘      └──────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use telemetry_synth::config::loader::{load_config, ConfigError};
use telemetry_synth::config::validation::validate_config;
use telemetry_synth::lifecycle::signals::wait_for_signal;
use telemetry_synth::observability::{logging, metrics};
use telemetry_synth::{HttpServer, Shutdown, SynthConfig};

#[derive(Parser)]
#[command(name = "telemetry-synth")]
#[command(about = "Synthetic traces, logs and uptime checks for observability demos", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SynthConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "telemetry-synth starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        traces_index = %config.indices.traces,
        default_rate = config.generation.default_events_per_second,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    tracing::info!("Shutting down");
    shutdown.trigger();

    server_task.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
