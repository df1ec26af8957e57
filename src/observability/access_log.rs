//! Transaction access log.
//!
//! # Responsibilities
//! - Append one timestamped line per logged event to the log file
//! - Mirror every line to the console sink via tracing
//! - Format request outcomes uniformly
//!
//! # Design Decisions
//! - Lines are `<YYYY-MM-DD HH:MM:SS> - <message>` in local time
//! - An unopenable log file degrades to console-only operation with a
//!   warning, it never fails startup
//! - Appends go straight to the file handle; entries are small and the
//!   mutex is held only for the write itself

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Append-only log of proxy transactions, written to both the configured
/// file and the console.
pub struct AccessLog {
    file: Option<Mutex<File>>,
}

impl AccessLog {
    /// Open the log file for appending, creating it if needed.
    pub fn open(path: &Path) -> Self {
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(Mutex::new(file)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not open log file, logging to console only"
                );
                None
            }
        };
        Self { file }
    }

    /// Write one timestamped line to both sinks.
    pub fn log(&self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{} - {}", timestamp, message);
            }
        }

        tracing::info!("{}", message);
    }

    /// Log one request outcome: `<client-ip> - <method> <target> - <status>`.
    pub fn log_request(&self, client_ip: &str, method: &str, target: &str, status: &str) {
        self.log(&format!(
            "{} - {} {} - {}",
            client_ip, method, target, status
        ));
    }
}
