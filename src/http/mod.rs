//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs  (accept loop, task per connection)
//!     → session.rs (header acquisition, parse, policy)
//!     → request.rs (method/URL/headers/host/port extraction)
//!     → forward.rs (origin connect, body stream, response relay)
//!     → response.rs (fixed error responses on any rejection)
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;
pub mod session;

pub use request::{ParseError, ParsedRequest};
pub use response::Rejection;
pub use server::ProxyServer;
