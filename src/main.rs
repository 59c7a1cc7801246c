//! Linecast - A Single-Threaded TCP Line Relay
//!
//! This is the main entry point for the relay server.
//! It parses the port argument, sets up logging, and runs the event loop
//! until a fatal error or Ctrl+C.

use anyhow::Context;
use linecast::{Config, ConfigError, Server};
use std::process;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Diagnostic printed on every unrecoverable failure
const FATAL_MESSAGE: &str = "Fatal error";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Binds the listener and runs the loop.
///
/// The server is owned by this future: when it returns, or is dropped by
/// the shutdown branch in `main`, every connection has been closed.
async fn serve(config: Config) -> anyhow::Result<()> {
    let server = Server::bind(&config)
        .await
        .context("failed to start listener")?;
    info!(
        "Linecast v{} listening on {}",
        linecast::VERSION,
        server.local_addr()?
    );

    server.run().await.context("event loop failed")
}

/// Resolves on Ctrl+C. If the handler cannot be installed the server just
/// keeps running.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}

fn fatal(err: &anyhow::Error) -> ! {
    error!("{:#}", err);
    eprintln!("{}", FATAL_MESSAGE);
    process::exit(1);
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::WrongArgumentCount) => {
            eprintln!("{}", ConfigError::WrongArgumentCount);
            process::exit(1);
        }
        Err(e) => {
            init_logging();
            fatal(&e.into());
        }
    };

    init_logging();

    tokio::select! {
        result = serve(config) => {
            if let Err(e) = result {
                fatal(&e);
            }
        }
        _ = shutdown_signal() => {}
    }

    info!("Server shutdown complete");
}
