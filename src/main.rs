//! Plaintext HTTP Forward Proxy
//!
//! A forward proxy built with Tokio: per-connection sessions parse one
//! request, consult a hot-reloading domain blocklist, and relay bytes
//! between client and origin.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                FORWARD PROXY                   │
//!                    │                                                │
//!   Client ─────────▶│  net::listener ──▶ http::session ──▶ security │
//!                    │        │               │   ▲          filter  │
//!                    │        │               ▼   │                  │
//!                    │        │         http::request                │
//!                    │        │               │                      │
//!                    │        │               ▼                      │
//!   Client ◀─────────│◀── http::forward ──────────────▶ Origin       │
//!                    │                                                │
//!                    │  config · lifecycle · observability            │
//!                    └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use forward_proxy::config;
use forward_proxy::lifecycle::{signals, Shutdown};
use forward_proxy::observability::logging;
use forward_proxy::ProxyServer;

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "A plaintext HTTP forward proxy with domain filtering", long_about = None)]
struct Cli {
    /// Path to the configuration file.
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage problems exit 1; --help and --version exit normally.
            if e.use_stderr() {
                let _ = e.print();
                std::process::exit(1);
            }
            e.exit();
        }
    };

    logging::init();

    let config = config::load_config(&cli.config);
    tracing::info!(
        address = %config.bind_address(),
        max_connections = config.max_connections,
        filter_file = %config.filter_file.display(),
        log_file = %config.log_file.display(),
        "Configuration loaded"
    );

    let server = ProxyServer::new(config);
    let listener = match server.bind() {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to initialize proxy server: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await;

    tracing::info!("Shutdown complete");
}
