//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Parse CLI → Load config → Open log + filter → Bind listener → Accept
//!
//! Shutdown (shutdown.rs / signals.rs):
//!     SIGINT/SIGTERM → trigger → accept loop exits → drain sessions → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any bind error at startup is fatal
//! - Shutdown never interrupts sessions; the drain wait is bounded

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
