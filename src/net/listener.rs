//! TCP listener setup.
//!
//! # Responsibilities
//! - Bind to the configured IPv4 address with `SO_REUSEADDR`
//! - Size the accept queue from the configured max_connections
//! - Accept incoming connections for the server loop
//!
//! # Design Decisions
//! - max_connections feeds only the listen backlog; there is deliberately no
//!   live-connection cap in front of the accept loop

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpSocket, TcpStream};

/// Error type for listener setup.
#[derive(Debug)]
pub enum ListenerError {
    /// The configured address did not parse.
    Addr(std::net::AddrParseError),
    /// Socket creation, bind or listen failed.
    Bind(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Addr(e) => write!(f, "Invalid listen address: {}", e),
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {}

/// The proxy's listening socket.
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind an IPv4 listening socket with `SO_REUSEADDR` and the given
    /// backlog.
    pub fn bind(address: &str, backlog: u32) -> Result<Self, ListenerError> {
        let addr: SocketAddr = address.parse().map_err(ListenerError::Addr)?;

        let socket = TcpSocket::new_v4().map_err(ListenerError::Bind)?;
        socket.set_reuseaddr(true).map_err(ListenerError::Bind)?;
        socket.bind(addr).map_err(ListenerError::Bind)?;
        let inner = socket.listen(backlog).map_err(ListenerError::Bind)?;

        let local_addr = inner.local_addr().map_err(ListenerError::Bind)?;
        tracing::info!(address = %local_addr, backlog, "Listener bound");

        Ok(Self { inner })
    }

    /// Accept the next inbound connection.
    pub async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr)> {
        self.inner.accept().await
    }

    /// The local address this listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}
