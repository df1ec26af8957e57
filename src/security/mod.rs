//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed request:
//!     → filter.rs (domain blocklist check)
//!     → blocked → 403, connection closed
//!     → allowed → forwarded upstream
//! ```
//!
//! # Design Decisions
//! - Policy is evaluated before any upstream contact
//! - The blocklist file is operator-editable at runtime; changes are picked
//!   up lazily on the next query

pub mod filter;

pub use filter::DomainFilter;
