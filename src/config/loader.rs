//! Configuration loading from disk.
//!
//! The config file is a flat `key=value` format: one setting per line,
//! `#`-prefixed comments and blank lines skipped, whitespace trimmed around
//! both key and value. Unknown keys are ignored so old configs keep working.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ProxyConfig;

/// Load configuration from a `key=value` file.
///
/// A missing or unreadable file is not an error: the defaults are returned
/// and a warning is logged for the operator. Values that fail to parse
/// (e.g. a non-numeric port) leave the corresponding default in place.
pub fn load_config(path: &Path) -> ProxyConfig {
    let mut config = ProxyConfig::default();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Could not open config file, using defaults"
            );
            return config;
        }
    };

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "listen_address" => config.listen_address = value.to_string(),
            "listen_port" => {
                if let Ok(port) = value.parse() {
                    config.listen_port = port;
                }
            }
            "max_connections" => {
                if let Ok(n) = value.parse() {
                    config.max_connections = n;
                }
            }
            "filter_file" => config.filter_file = PathBuf::from(value),
            "log_file" => config.log_file = PathBuf::from(value),
            "cache_dir" => config.cache_dir = PathBuf::from(value),
            "enable_caching" => config.enable_caching = value == "true" || value == "1",
            _ => {}
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_key_value_pairs() {
        let file = write_config(
            "listen_address = 0.0.0.0\n\
             listen_port=9000\n\
             max_connections = 50\n\
             filter_file = /etc/proxy/blocked.txt\n\
             log_file = /var/log/proxy.log\n\
             enable_caching = true\n",
        );

        let config = load_config(file.path());
        assert_eq!(config.listen_address, "0.0.0.0");
        assert_eq!(config.listen_port, 9000);
        assert_eq!(config.max_connections, 50);
        assert_eq!(config.filter_file, PathBuf::from("/etc/proxy/blocked.txt"));
        assert_eq!(config.log_file, PathBuf::from("/var/log/proxy.log"));
        assert!(config.enable_caching);
    }

    #[test]
    fn skips_comments_blanks_and_unknown_keys() {
        let file = write_config(
            "# proxy settings\n\
             \n\
             listen_port = 9001\n\
             not_a_real_key = whatever\n\
             no equals sign here\n",
        );

        let config = load_config(file.path());
        assert_eq!(config.listen_port, 9001);
        // Everything else stays at defaults.
        assert_eq!(config.listen_address, "127.0.0.1");
        assert_eq!(config.max_connections, 100);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/proxy.conf"));
        assert_eq!(config, ProxyConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:8888");
    }

    #[test]
    fn unparseable_numbers_keep_defaults() {
        let file = write_config("listen_port = not-a-port\nmax_connections = ??\n");
        let config = load_config(file.path());
        assert_eq!(config.listen_port, 8888);
        assert_eq!(config.max_connections, 100);
    }

    #[test]
    fn enable_caching_accepts_literal_one() {
        let file = write_config("enable_caching = 1\n");
        assert!(load_config(file.path()).enable_caching);

        let file = write_config("enable_caching = yes\n");
        assert!(!load_config(file.path()).enable_caching);
    }
}
