//! Per-connection session handling.
//!
//! # Data Flow
//! ```text
//! AwaitHeaders (chunked reads, 3s inactivity timeout, find \r\n\r\n)
//!     → Parsed      (header block → ParsedRequest)
//!     → Authorized  (CONNECT rejected, blocklist consulted)
//!     → Forwarding  (hand off to the relay)
//!     → Closed      (client socket dropped on every exit path)
//! ```
//!
//! # Design Decisions
//! - The state machine is linear with early exits; nothing is retried
//! - Bytes read past the header terminator are body overflow and travel to
//!   the forwarder instead of being discarded
//! - Header bytes are parsed lossily for extraction but forwarded verbatim

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::http::forward::forward_request;
use crate::http::request::ParsedRequest;
use crate::http::response::{send_rejection, Rejection};
use crate::observability::AccessLog;
use crate::security::DomainFilter;

/// Read chunk size during header acquisition.
const READ_CHUNK: usize = 8192;

/// Inactivity timeout for client reads while awaiting headers. No timeout
/// applies once forwarding begins.
const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(3);

/// One client connection, from accept to close.
pub struct Session {
    stream: TcpStream,
    client_ip: IpAddr,
    filter: Arc<DomainFilter>,
    access_log: Arc<AccessLog>,
}

impl Session {
    pub fn new(
        stream: TcpStream,
        client_ip: IpAddr,
        filter: Arc<DomainFilter>,
        access_log: Arc<AccessLog>,
    ) -> Self {
        Self {
            stream,
            client_ip,
            filter,
            access_log,
        }
    }

    /// Drive the session to completion. The client socket closes when the
    /// session drops, whatever the exit path.
    pub async fn run(mut self) {
        let Some((header_block, overflow)) = self.read_header_block().await else {
            tracing::debug!(
                client = %self.client_ip,
                "Connection closed before header terminator"
            );
            send_rejection(&mut self.stream, Rejection::ClientProtocol).await;
            return;
        };

        let header_text = String::from_utf8_lossy(&header_block).into_owned();
        let request = match ParsedRequest::parse(&header_text) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(client = %self.client_ip, error = %e, "Unparseable request");
                self.reject("UNKNOWN", "Invalid Request", Rejection::ClientProtocol)
                    .await;
                return;
            }
        };

        if request.method == "CONNECT" {
            self.reject(&request.method, &request.host, Rejection::UnsupportedMethod)
                .await;
            return;
        }

        if self.filter.is_blocked(&request.host) {
            self.reject(&request.method, &request.host, Rejection::PolicyRejection)
                .await;
            return;
        }

        let content_length = request.content_length();

        match forward_request(
            &mut self.stream,
            &request,
            &header_block,
            &overflow,
            content_length,
        )
        .await
        {
            Ok(stats) => {
                self.access_log.log_request(
                    &self.client_ip.to_string(),
                    &request.method,
                    &request.host,
                    &stats.status_text(),
                );
            }
            Err(rejection) => {
                self.reject(&request.method, &request.host, rejection).await;
            }
        }
    }

    /// Read until the `\r\n\r\n` terminator, returning the header block
    /// (terminator included) and any overflow bytes read past it.
    ///
    /// Returns `None` on timeout or when the client closes first.
    async fn read_header_block(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let read = match timeout(HEADER_READ_TIMEOUT, self.stream.read(&mut chunk)).await {
                Ok(Ok(n)) if n > 0 => n,
                _ => return None,
            };
            buffer.extend_from_slice(&chunk[..read]);

            // The terminator can straddle reads; rescan from up to three
            // bytes before the new data.
            let search_from = buffer.len().saturating_sub(read + 3);
            if let Some(pos) = find_terminator(&buffer[search_from..]) {
                let overflow = buffer.split_off(search_from + pos + 4);
                return Some((buffer, overflow));
            }
        }
    }

    /// Log the outcome and send the rejection's fixed response.
    async fn reject(&mut self, method: &str, target: &str, rejection: Rejection) {
        self.access_log.log_request(
            &self.client_ip.to_string(),
            method,
            target,
            rejection.log_status(),
        );
        send_rejection(&mut self.stream, rejection).await;
    }
}

fn find_terminator(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminator_found_with_overflow() {
        let data = b"GET / HTTP/1.1\r\nHost: x\r\n\r\nBODYBYTES";
        let pos = find_terminator(data).unwrap();
        assert_eq!(&data[pos + 4..], b"BODYBYTES");
    }

    #[test]
    fn terminator_absent() {
        assert_eq!(find_terminator(b"GET / HTTP/1.1\r\nHost: x\r\n"), None);
    }
}
