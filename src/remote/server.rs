//! Remote control listener
//!
//! One request per connection: read it, press "next" if asked, answer with
//! the remote page and close. Every connection runs in its own task under a
//! timeout so a slow or broken client never holds up the accept loop.

use super::page::http_response;
use crate::actuator::Actuator;
use crate::{HandCtlError, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

/// Configuration for the remote listener
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Whether to start the listener at all
    pub enabled: bool,

    /// Listen address
    pub bind: String,

    /// Upper bound on handling one connection
    pub request_timeout_ms: u64,

    /// Bytes read from a request before giving up on finding its end
    pub max_request_bytes: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "0.0.0.0:5000".to_string(),
            request_timeout_ms: 2000,
            max_request_bytes: 1024,
        }
    }
}

/// Commands the listener understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteCommand {
    Next,
}

impl RemoteCommand {
    /// Recognize `GET /next` from the browser page or a bare `NEXT` line from
    /// the phone uplink. Anything else is ignored.
    pub fn parse(request: &str) -> Option<Self> {
        let lower = request.to_ascii_lowercase();
        let browser = lower.contains("get /next");
        let uplink = lower.lines().any(|line| line.trim() == "next");
        if browser || uplink {
            Some(RemoteCommand::Next)
        } else {
            None
        }
    }
}

/// Bound listener ready to serve
pub struct RemoteServer {
    listener: TcpListener,
    config: RemoteConfig,
    actuator: Arc<dyn Actuator>,
}

impl RemoteServer {
    /// Bind the listen socket; failure here is fatal at startup
    pub async fn bind(config: RemoteConfig, actuator: Arc<dyn Actuator>) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind).await.map_err(|e| {
            HandCtlError::NetworkError(format!("Failed to bind {}: {}", config.bind, e))
        })?;
        Ok(Self {
            listener,
            config,
            actuator,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the task is dropped
    pub async fn serve(self) {
        match self.listener.local_addr() {
            Ok(addr) => info!("Remote control listening on {}", addr),
            Err(_) => info!("Remote control listening on {}", self.config.bind),
        }

        let timeout = Duration::from_millis(self.config.request_timeout_ms);
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Accept failed: {}", e);
                    continue;
                }
            };

            let actuator = Arc::clone(&self.actuator);
            let max_bytes = self.config.max_request_bytes;
            tokio::spawn(async move {
                match tokio::time::timeout(timeout, handle_connection(stream, actuator, max_bytes))
                    .await
                {
                    Ok(Ok(Some(command))) => debug!("{}: handled {:?}", peer, command),
                    Ok(Ok(None)) => debug!("{}: no command", peer),
                    Ok(Err(e)) => warn!("{}: connection error: {}", peer, e),
                    Err(_) => warn!("{}: timed out after {:?}", peer, timeout),
                }
            });
        }
    }
}

/// Read one request, act on it and send the page back
pub async fn handle_connection(
    mut stream: TcpStream,
    actuator: Arc<dyn Actuator>,
    max_bytes: usize,
) -> Result<Option<RemoteCommand>> {
    let request = read_request(&mut stream, max_bytes).await?;
    let command = RemoteCommand::parse(&request);

    if command == Some(RemoteCommand::Next) {
        info!("Remote command: NEXT");
        if let Err(e) = actuator.press_next() {
            warn!("Failed to press next: {}", e);
        }
    }

    // The phone uplink closes without reading, so a failed write is expected there
    if let Err(e) = write_response(&mut stream).await {
        debug!("Response not delivered: {}", e);
    }

    Ok(command)
}

async fn read_request(stream: &mut TcpStream, max_bytes: usize) -> Result<String> {
    let mut buf = Vec::with_capacity(max_bytes.min(4096));
    let mut chunk = [0u8; 512];

    while buf.len() < max_bytes {
        let n = stream
            .read(&mut chunk)
            .await
            .map_err(|e| HandCtlError::NetworkError(format!("read failed: {}", e)))?;
        if n == 0 {
            break;
        }
        let take = n.min(max_bytes - buf.len());
        buf.extend_from_slice(&chunk[..take]);
        if request_complete(&buf) {
            break;
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn request_complete(buf: &[u8]) -> bool {
    buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.windows(2).any(|w| w == b"\n\n")
}

async fn write_response(stream: &mut TcpStream) -> std::io::Result<()> {
    stream.write_all(http_response().as_bytes()).await?;
    stream.shutdown().await
}
