//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (key=value)
//!     → loader.rs (parse, fall back to defaults)
//!     → ProxyConfig (immutable)
//!     → shared with all subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reload
//! - All fields have defaults so a missing config file is a warning, not a failure
//! - Unknown keys and unparseable values are ignored, keeping defaults

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::ProxyConfig;
