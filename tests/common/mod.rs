//! Simulated Bot API for integration tests
#![allow(dead_code)]

use native_tls::{Identity, TlsAcceptor};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use telegram_logger::{ConfigOptions, TelegramConfig};

pub const TOKEN: &str = "123456:TEST-TOKEN";

/// Self-signed certificate for `localhost`, `127.0.0.1` and `::1`
pub const TEST_CERT_PEM: &[u8] = include_bytes!("../fixtures/localhost.crt");
const TEST_KEY_PEM: &[u8] = include_bytes!("../fixtures/localhost.key");

/// One request as seen by the server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Decoded form fields
    pub fn form(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn form_value(&self, key: &str) -> Option<String> {
        self.form().into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// How the server answers after reading a request
#[derive(Debug, Clone)]
pub enum Reply {
    Json { status: u16, body: String },
    /// Keep the connection open without answering
    Hang(Duration),
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Reply::Json {
            status,
            body: body.to_string(),
        }
    }
}

pub struct MockBotApi {
    pub base_url: String,
    requests: Receiver<CapturedRequest>,
}

impl MockBotApi {
    /// Serve a single connection with `reply`
    pub fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock server");
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => return,
            };
            serve(stream, reply, tx);
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests: rx,
        }
    }

    /// Same as [`MockBotApi::start`], behind TLS with the fixture certificate
    pub fn start_tls(reply: Reply) -> Self {
        let identity = Identity::from_pkcs8(TEST_CERT_PEM, TEST_KEY_PEM).expect("Failed to load test identity");
        let acceptor = TlsAcceptor::new(identity).expect("Failed to build TLS acceptor");
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock server");
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let stream = match acceptor.accept(stream) {
                Ok(stream) => stream,
                Err(_) => return,
            };
            serve(stream, reply, tx);
        });

        Self {
            base_url: format!("https://127.0.0.1:{}", port),
            requests: rx,
        }
    }

    pub fn config(&self) -> TelegramConfig {
        self.config_with(ConfigOptions::default())
    }

    pub fn config_with(&self, options: ConfigOptions) -> TelegramConfig {
        TelegramConfig::from_options(ConfigOptions {
            bot_token: TOKEN.to_string(),
            chat_id: "-100200300".to_string(),
            api_base_url: Some(self.base_url.clone()),
            ..options
        })
        .expect("valid test config")
    }

    /// Wait for the captured request
    pub fn received(&self) -> CapturedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("mock server received no request")
    }
}

/// Base URL of a port nobody listens on
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn unreachable_config() -> TelegramConfig {
    TelegramConfig::from_options(ConfigOptions {
        api_base_url: Some(unreachable_base_url()),
        ..ConfigOptions::new(TOKEN, "-100200300")
    })
    .expect("valid test config")
}

fn serve<S: Read + Write>(stream: S, reply: Reply, tx: mpsc::Sender<CapturedRequest>) {
    let mut reader = BufReader::new(stream);
    let request = match read_request(&mut reader) {
        Some(request) => request,
        None => return,
    };
    let _ = tx.send(request);

    let mut stream = reader.into_inner();
    match reply {
        Reply::Json { status, body } => write_response(&mut stream, status, &body),
        Reply::Hang(duration) => thread::sleep(duration),
    }
}

fn read_request<R: BufRead>(reader: &mut R) -> Option<CapturedRequest> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).ok()?;

    Some(CapturedRequest {
        request_line: request_line.trim_end().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn write_response<W: Write>(stream: &mut W, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
