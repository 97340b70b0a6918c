//! Best-effort delivery - write the request and hang up
//!
//! Opens a fresh connection per message (TLS for `https` endpoints, plain
//! TCP for `http` ones), writes a complete HTTP/1.1 `POST` with
//! `Connection: close` and closes the socket without reading the response.
//!
//! Only the connection step can fail observably. A wrong token, a chat the
//! bot cannot post to, or any other rejection by the Bot API goes
//! unnoticed; use [`ConfirmedDelivery`](super::ConfirmedDelivery) when that
//! matters.

use super::{encode_send_message, DeliveryStrategy, FORM_CONTENT_TYPE};
use crate::config::TelegramConfig;
use crate::error::{Error, Result};
use native_tls::TlsConnector;
use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::{Host, Url};

/// Upper bound for TCP connect and TLS handshake
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fire-and-forget delivery over a raw socket
#[derive(Clone)]
pub struct BestEffortDelivery {
    connect_timeout: Duration,
    tls: TlsConnector,
}

impl BestEffortDelivery {
    pub fn new() -> Result<Self> {
        Self::with_connect_timeout(DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self> {
        let tls = TlsConnector::new()
            .map_err(|e| Error::Transport(format!("Failed to initialize TLS: {}", e)))?;
        Ok(Self::with_tls_connector(connect_timeout, tls))
    }

    /// Use a preconfigured connector (extra root certificates, pinned protocols, ...)
    pub fn with_tls_connector(connect_timeout: Duration, tls: TlsConnector) -> Self {
        Self {
            connect_timeout,
            tls,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    fn connect(&self, endpoint: &Url) -> Result<TcpStream> {
        let addrs: Vec<SocketAddr> = endpoint
            .socket_addrs(|| None)
            .map_err(|e| Error::Transport(format!("Failed to resolve host: {}", e)))?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }

        Err(Error::Transport(match last_error {
            Some(e) => format!("Socket error: {}", e),
            None => "Socket error: host resolved to no addresses".to_string(),
        }))
    }
}

impl std::fmt::Debug for BestEffortDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestEffortDelivery")
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

impl DeliveryStrategy for BestEffortDelivery {
    fn name(&self) -> &str {
        "best_effort"
    }

    fn deliver(&self, config: &TelegramConfig, text: &str) -> Result<bool> {
        let endpoint = Url::parse(&config.send_message_url())
            .map_err(|e| Error::Transport(format!("Invalid endpoint: {}", e)))?;
        let host = endpoint
            .host_str()
            .ok_or_else(|| Error::Transport("Endpoint has no host".to_string()))?
            .to_string();

        let body = encode_send_message(config, text);
        let request = build_request(&endpoint, &host, &body);

        debug!(
            strategy = self.name(),
            chat_id = %config.chat_id(),
            host = %host,
            text_len = text.len(),
            "Sending message without waiting for response"
        );

        let start = Instant::now();
        let stream = self.connect(&endpoint).map_err(|e| {
            warn!(strategy = self.name(), host = %host, error = %e, "Connection failed");
            e
        })?;
        // bounds the TLS handshake and the write
        stream
            .set_read_timeout(Some(self.connect_timeout))
            .and_then(|_| stream.set_write_timeout(Some(self.connect_timeout)))
            .map_err(|e| Error::Transport(format!("Socket error: {}", e)))?;

        if endpoint.scheme() == "https" {
            let mut tls_stream = self
                .tls
                .connect(&tls_domain(&endpoint)?, stream)
                .map_err(|e| Error::Transport(format!("TLS handshake failed: {}", e)))?;
            write_request(&mut tls_stream, &request)?;
        } else {
            let mut stream = stream;
            write_request(&mut stream, &request)?;
        }

        debug!(
            strategy = self.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request written, connection closed"
        );
        Ok(true)
    }

    fn with_defaults() -> Result<Self> {
        Self::new()
    }
}

/// Name to verify the server certificate against; IPv6 literals lose their brackets
fn tls_domain(endpoint: &Url) -> Result<String> {
    match endpoint.host() {
        Some(Host::Domain(domain)) => Ok(domain.to_string()),
        Some(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        None => Err(Error::Transport("Endpoint has no host".to_string())),
    }
}

/// Raw HTTP/1.1 request for the `sendMessage` endpoint
fn build_request(endpoint: &Url, host: &str, body: &str) -> String {
    let host_header = match endpoint.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    format!(
        "POST {} HTTP/1.1\r\n\
         Host: {}\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        endpoint.path(),
        host_header,
        FORM_CONTENT_TYPE,
        body.len(),
        body
    )
}

// The stream is dropped (and the socket closed) by the caller right after.
fn write_request<W: Write>(stream: &mut W, request: &str) -> Result<()> {
    stream
        .write_all(request.as_bytes())
        .and_then(|_| stream.flush())
        .map_err(|e| Error::Transport(format!("Socket write failed: {}", e)))
}
