//! Client-facing error responses.
//!
//! # Responsibilities
//! - Define the terminal per-connection rejection taxonomy
//! - Map each rejection to its fixed status line and access-log status
//! - Write the error response to the client socket
//!
//! # Design Decisions
//! - Every rejection is terminal: one fixed response, one log line, close
//! - Responses always carry `Connection: close`; no body is sent
//! - Write failures are ignored: the connection is being torn down anyway

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Terminal rejection of a connection before or instead of forwarding.
///
/// The `Display` text is the reason phrase sent on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Malformed or incomplete request.
    #[error("Bad Request")]
    ClientProtocol,

    /// CONNECT tunneling is unsupported by design.
    #[error("Not Implemented (HTTPS not supported)")]
    UnsupportedMethod,

    /// The target host is on the blocklist.
    #[error("Forbidden - Site Blocked")]
    PolicyRejection,

    /// The origin host did not resolve to a usable address.
    #[error("Bad Gateway - DNS Resolution Failed")]
    UpstreamDns,

    /// The origin refused or failed the connection.
    #[error("Bad Gateway - Could not connect")]
    UpstreamConnect,
}

impl Rejection {
    /// HTTP status code sent to the client.
    pub fn status_code(&self) -> u16 {
        match self {
            Rejection::ClientProtocol => 400,
            Rejection::UnsupportedMethod => 501,
            Rejection::PolicyRejection => 403,
            Rejection::UpstreamDns | Rejection::UpstreamConnect => 502,
        }
    }

    /// Status text recorded in the access log for this outcome.
    pub fn log_status(&self) -> &'static str {
        match self {
            Rejection::ClientProtocol => "400 Bad Request",
            Rejection::UnsupportedMethod => "501 Not Implemented",
            Rejection::PolicyRejection => "403 BLOCKED",
            Rejection::UpstreamDns => "502 DNS Error",
            Rejection::UpstreamConnect => "502 Connection Failed",
        }
    }

    /// The raw response bytes for this rejection.
    pub fn response_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nConnection: close\r\n\r\n",
            self.status_code(),
            self
        )
        .into_bytes()
    }
}

/// Write the rejection's fixed response to the client.
pub async fn send_rejection(stream: &mut TcpStream, rejection: Rejection) {
    let _ = stream.write_all(&rejection.response_bytes()).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_format_is_fixed() {
        let bytes = Rejection::PolicyRejection.response_bytes();
        assert_eq!(
            bytes,
            b"HTTP/1.1 403 Forbidden - Site Blocked\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(Rejection::ClientProtocol.status_code(), 400);
        assert_eq!(Rejection::UnsupportedMethod.status_code(), 501);
        assert_eq!(Rejection::PolicyRejection.status_code(), 403);
        assert_eq!(Rejection::UpstreamDns.status_code(), 502);
        assert_eq!(Rejection::UpstreamConnect.status_code(), 502);
    }

    #[test]
    fn log_status_uses_fixed_markers() {
        assert_eq!(Rejection::PolicyRejection.log_status(), "403 BLOCKED");
        assert_eq!(Rejection::UpstreamDns.log_status(), "502 DNS Error");
    }
}
