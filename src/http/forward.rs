//! Bidirectional request/response relay.
//!
//! # Responsibilities
//! - Resolve the origin host (IPv4 only) and connect
//! - Replay the header block and already-read body overflow
//! - Stream the remaining declared body from the client
//! - Relay the origin's response until it closes the connection
//! - Account uploaded and downloaded bytes
//!
//! # Design Decisions
//! - The proxy never inspects the origin's status line; the relay is
//!   byte-for-byte and the logged "200 OK" marks relay completion only
//! - Mid-stream read/write failures are ordinary stream termination: the
//!   relay stops and both sockets close, with no error response attempted
//! - No timeout applies to origin I/O; a silent origin parks this task

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};

use crate::http::request::ParsedRequest;
use crate::http::response::Rejection;

/// Relay chunk size for body streaming and response relay.
const CHUNK_SIZE: usize = 8192;

/// Byte tallies for one completed relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    /// Bytes successfully sent toward the origin.
    pub upload_bytes: u64,
    /// Bytes successfully sent back to the client.
    pub download_bytes: u64,
}

impl RelayStats {
    /// Synthetic completion status for the access log. Not the origin's
    /// actual HTTP status.
    pub fn status_text(&self) -> String {
        format!(
            "200 OK (Up: {}B, Down: {}B)",
            self.upload_bytes, self.download_bytes
        )
    }
}

/// Forward a parsed request to its origin and relay the response back.
///
/// Resolution and connection failures return a [`Rejection`] before any byte
/// reaches the origin. Once connected, the relay always runs to termination
/// and reports its tallies; the origin socket is dropped unconditionally.
pub async fn forward_request(
    client: &mut TcpStream,
    request: &ParsedRequest,
    header_block: &[u8],
    overflow: &[u8],
    content_length: u64,
) -> Result<RelayStats, Rejection> {
    let target = format!("{}:{}", request.host, request.port);

    let addr = match lookup_host(&target).await {
        Ok(mut addrs) => addrs.find(|addr| addr.is_ipv4()),
        Err(_) => None,
    }
    .ok_or(Rejection::UpstreamDns)?;

    let mut origin = TcpStream::connect(addr)
        .await
        .map_err(|_| Rejection::UpstreamConnect)?;

    let mut upload_bytes = 0u64;
    let mut download_bytes = 0u64;

    if origin.write_all(header_block).await.is_ok() {
        upload_bytes += header_block.len() as u64;

        if overflow.is_empty() || origin.write_all(overflow).await.is_ok() {
            upload_bytes += overflow.len() as u64;

            // Stream the part of the declared body not captured as overflow.
            // A short body is tolerated: client EOF ends the stream early.
            let mut remaining = content_length as i64 - overflow.len() as i64;
            let mut buf = [0u8; CHUNK_SIZE];
            while remaining > 0 {
                let to_read = (remaining as usize).min(CHUNK_SIZE);
                let read = match client.read(&mut buf[..to_read]).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => n,
                };
                if origin.write_all(&buf[..read]).await.is_err() {
                    break;
                }
                upload_bytes += read as u64;
                remaining -= read as i64;
            }
        }
    }

    // Relay the response until the origin closes. The origin may already be
    // gone if the upload failed mid-stream; the first read ends the loop.
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let read = match origin.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        if client.write_all(&buf[..read]).await.is_err() {
            break;
        }
        download_bytes += read as u64;
    }

    Ok(RelayStats {
        upload_bytes,
        download_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_carries_byte_counts() {
        let stats = RelayStats {
            upload_bytes: 123,
            download_bytes: 4567,
        };
        assert_eq!(stats.status_text(), "200 OK (Up: 123B, Down: 4567B)");
    }
}
