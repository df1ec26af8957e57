//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Operational events → logging.rs (tracing subscriber, stdout)
//! Transactions       → access_log.rs (timestamped file + console mirror)
//! ```
//!
//! # Design Decisions
//! - The access log is the system of record for request outcomes; tracing
//!   carries operational detail and mirrors access lines to the console

pub mod access_log;
pub mod logging;

pub use access_log::AccessLog;
