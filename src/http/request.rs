//! HTTP request parsing.
//!
//! # Responsibilities
//! - Parse the request line (method, target URL, version)
//! - Collect headers into a map (last occurrence wins)
//! - Derive host, port and path from the `Host` header and/or an
//!   absolute-form target URL
//!
//! # Design Decisions
//! - The `Host` header takes precedence over the URL authority for host/port
//! - A request is usable only when both method and host are known
//! - Only the header block is expected as input; any trailing lines are
//!   captured into `body` as a best-effort fallback rather than an error

use std::collections::HashMap;
use std::fmt;

/// Error type for request parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The request line did not decompose into method, target and version.
    RequestLine,
    /// No host could be derived from the Host header or the target URL.
    MissingHost,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::RequestLine => write!(f, "malformed request line"),
            ParseError::MissingHost => write!(f, "request carries no host"),
        }
    }
}

impl std::error::Error for ParseError {}

/// A parsed HTTP request, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// Request method token (e.g. "GET").
    pub method: String,
    /// Target URL exactly as received.
    pub url: String,
    /// Protocol version string (e.g. "HTTP/1.1").
    pub version: String,
    /// Header map. Keys are case-sensitive as received; duplicate headers
    /// overwrite earlier occurrences.
    pub headers: HashMap<String, String>,
    /// Origin host, from the Host header or the URL authority.
    pub host: String,
    /// Origin port, defaulting to 80.
    pub port: u16,
    /// Request path, defaulting to "/" for authority-only absolute URLs.
    pub path: String,
    /// Bytes appearing after the header terminator in the parser input.
    /// Normally empty: the session reader isolates the header block and
    /// passes overflow separately.
    pub body: String,
}

impl ParsedRequest {
    /// Parse a header block into a request.
    ///
    /// Lines are split on `\n` with a trailing `\r` trimmed. Fails if the
    /// request line is malformed or no host can be derived.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let mut lines: Vec<&str> = raw.split('\n').collect();
        // A trailing newline yields one empty tail segment, not a line.
        if lines.last() == Some(&"") {
            lines.pop();
        }
        let mut lines = lines.into_iter();

        let request_line = lines.next().ok_or(ParseError::RequestLine)?;
        let request_line = request_line.strip_suffix('\r').unwrap_or(request_line);
        let mut tokens = request_line.split_whitespace();
        let (Some(method), Some(url), Some(version), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(ParseError::RequestLine);
        };

        let mut headers = HashMap::new();
        let mut host = String::new();
        let mut port: u16 = 80;
        let mut body = String::new();
        let mut in_headers = true;

        for line in lines {
            if in_headers {
                let line = line.strip_suffix('\r').unwrap_or(line);
                if line.is_empty() {
                    in_headers = false;
                    continue;
                }
                if let Some((name, value)) = line.split_once(':') {
                    let value = value.trim_start();
                    if name == "Host" {
                        (host, port) = split_host_port(value);
                    }
                    headers.insert(name.to_string(), value.to_string());
                }
            } else {
                body.push_str(line);
                body.push('\n');
            }
        }

        let path;
        if let Some(rest) = url.strip_prefix("http://") {
            let (authority, url_path) = match rest.find('/') {
                Some(idx) => (&rest[..idx], &rest[idx..]),
                None => (rest, "/"),
            };
            path = url_path.to_string();
            if host.is_empty() {
                (host, port) = split_host_port(authority);
            }
        } else {
            path = url.to_string();
        }

        if method.is_empty() || host.is_empty() {
            return Err(ParseError::MissingHost);
        }

        Ok(Self {
            method: method.to_string(),
            url: url.to_string(),
            version: version.to_string(),
            headers,
            host,
            port,
            path,
            body,
        })
    }

    /// Declared body length from the Content-Length header.
    ///
    /// Both the exact-case and all-lowercase spellings are consulted, first
    /// match wins. An absent or non-numeric value degrades to zero.
    pub fn content_length(&self) -> u64 {
        self.headers
            .get("Content-Length")
            .or_else(|| self.headers.get("content-length"))
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Split `host[:port]`, defaulting the port to 80. A non-numeric port also
/// falls back to 80 rather than failing the parse.
fn split_host_port(authority: &str) -> (String, u16) {
    match authority.split_once(':') {
        Some((host, port)) => (host.to_string(), port.parse().unwrap_or(80)),
        None => (authority.to_string(), 80),
    }
}
