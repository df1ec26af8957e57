//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use forward_proxy::{ProxyConfig, ProxyServer, Shutdown};

/// Build a config pointing filter and log files into `dir`, listening on an
/// ephemeral port.
pub fn test_config(dir: &tempfile::TempDir, filter_contents: &str) -> ProxyConfig {
    let filter_file = dir.path().join("filters.txt");
    std::fs::write(&filter_file, filter_contents).unwrap();

    ProxyConfig {
        listen_address: "127.0.0.1".to_string(),
        listen_port: 0,
        filter_file,
        log_file: dir.path().join("proxy.log"),
        ..ProxyConfig::default()
    }
}

/// Start the proxy on an ephemeral port. Returns the bound address and the
/// shutdown handle keeping the server alive.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown, PathBuf) {
    let log_file = config.log_file.clone();
    let server = ProxyServer::new(config);
    let listener = server.bind().unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await;
    });

    (addr, shutdown, log_file)
}

/// Start a mock origin that answers every connection with a fixed body.
pub async fn start_mock_origin(body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a mock origin that reads the full request (headers plus declared
/// body) and echoes the body back.
pub async fn start_echo_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut received = Vec::new();
                let mut chunk = [0u8; 8192];

                let header_end = loop {
                    let Ok(n) = socket.read(&mut chunk).await else {
                        return;
                    };
                    if n == 0 {
                        return;
                    }
                    received.extend_from_slice(&chunk[..n]);
                    if let Some(pos) = received
                        .windows(4)
                        .position(|window| window == b"\r\n\r\n")
                    {
                        break pos + 4;
                    }
                };

                let headers = String::from_utf8_lossy(&received[..header_end]).to_string();
                let content_length: usize = headers
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse().ok())?
                    })
                    .unwrap_or(0);

                while received.len() - header_end < content_length {
                    let Ok(n) = socket.read(&mut chunk).await else {
                        return;
                    };
                    if n == 0 {
                        break;
                    }
                    received.extend_from_slice(&chunk[..n]);
                }

                let body = &received[header_end..];
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Read the access log until `needle` appears or the attempts run out.
pub async fn wait_for_log_line(log_file: &PathBuf, needle: &str) -> Option<String> {
    for _ in 0..50 {
        if let Ok(content) = std::fs::read_to_string(log_file) {
            if let Some(line) = content.lines().find(|line| line.contains(needle)) {
                return Some(line.to_string());
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    None
}
