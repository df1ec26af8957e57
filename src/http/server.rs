//! Proxy server setup and accept loop.
//!
//! # Responsibilities
//! - Own the long-lived subsystems (config, filter, access log, tracker)
//! - Bind the listening socket
//! - Accept connections and spawn one session task per client
//! - Coordinate graceful shutdown: stop accepting, drain sessions, log

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::ProxyConfig;
use crate::http::session::Session;
use crate::net::{ConnectionTracker, Listener, ListenerError};
use crate::observability::AccessLog;
use crate::security::DomainFilter;

/// How long shutdown waits for in-flight sessions before giving up.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// The forward proxy server.
pub struct ProxyServer {
    config: ProxyConfig,
    filter: Arc<DomainFilter>,
    access_log: Arc<AccessLog>,
    tracker: ConnectionTracker,
}

impl ProxyServer {
    /// Create a server from configuration. The filter file is loaded eagerly
    /// and the access log opened here.
    pub fn new(config: ProxyConfig) -> Self {
        let filter = Arc::new(DomainFilter::new(&config.filter_file));
        let access_log = Arc::new(AccessLog::open(&config.log_file));

        Self {
            config,
            filter,
            access_log,
            tracker: ConnectionTracker::new(),
        }
    }

    /// Bind the listening socket and announce startup.
    pub fn bind(&self) -> Result<Listener, ListenerError> {
        let listener = Listener::bind(&self.config.bind_address(), self.config.max_connections)?;
        self.access_log
            .log(&format!("Proxy started on {}", self.config.bind_address()));
        Ok(listener)
    }

    /// Run the accept loop until the shutdown signal fires, then drain.
    pub async fn run(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!("Proxy is running");

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let session = Session::new(
                            stream,
                            peer.ip(),
                            Arc::clone(&self.filter),
                            Arc::clone(&self.access_log),
                        );
                        let guard = self.tracker.track();
                        tokio::spawn(async move {
                            let _guard = guard;
                            session.run().await;
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept a connection");
                        self.access_log.log("Warning: Failed to accept a connection.");
                    }
                },
                _ = shutdown.recv() => break,
            }
        }

        // Closing the listener stops new connections; in-flight sessions are
        // never interrupted and get a bounded window to finish.
        drop(listener);
        if !self.tracker.drain(DRAIN_TIMEOUT).await {
            tracing::warn!(
                active = self.tracker.active_count(),
                "Shutdown drain timed out with sessions still running"
            );
        }
        self.access_log.log("Proxy server has shut down.");
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
