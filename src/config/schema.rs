//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All fields have defaults so the server can start without a config file.

use std::path::PathBuf;

/// Root configuration for the forward proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Address to bind the listening socket to.
    pub listen_address: String,

    /// Port to listen on.
    pub listen_port: u16,

    /// Listen backlog. This only sizes the accept queue; it is not a cap on
    /// live connections.
    pub max_connections: u32,

    /// Path to the domain blocklist file.
    pub filter_file: PathBuf,

    /// Path to the access log file.
    pub log_file: PathBuf,

    /// Directory for cached responses. Parsed and stored but unused: caching
    /// is not implemented.
    pub cache_dir: PathBuf,

    /// Whether response caching is enabled. Unused, see `cache_dir`.
    pub enable_caching: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_address: "127.0.0.1".to_string(),
            listen_port: 8888,
            max_connections: 100,
            filter_file: PathBuf::from("filters.txt"),
            log_file: PathBuf::from("proxy.log"),
            cache_dir: PathBuf::from("cache"),
            enable_caching: false,
        }
    }
}

impl ProxyConfig {
    /// The full socket address the listener should bind to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen_address, self.listen_port)
    }
}
