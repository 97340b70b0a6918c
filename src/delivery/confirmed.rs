//! Confirmed delivery - waits for and checks the Bot API acknowledgement

use super::{encode_send_message, DeliveryStrategy, FORM_CONTENT_TYPE};
use crate::config::TelegramConfig;
use crate::error::{Error, Result, UNKNOWN_ERROR};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, warn};

/// `sendMessage` response envelope; anything unparseable counts as `ok: false`
#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl ApiResponse {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn into_description(self) -> String {
        self.description.unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }
}

/// Synchronous delivery over a blocking HTTP client.
///
/// The request timeout is taken from the config on every call, so changing
/// it through `TelegramConfig::set_timeout` applies to the next message.
#[derive(Debug, Clone)]
pub struct ConfirmedDelivery {
    client: reqwest::blocking::Client,
}

impl ConfirmedDelivery {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxy, custom TLS roots, ...)
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl DeliveryStrategy for ConfirmedDelivery {
    fn name(&self) -> &str {
        "confirmed"
    }

    fn deliver(&self, config: &TelegramConfig, text: &str) -> Result<bool> {
        let body = encode_send_message(config, text);

        debug!(
            strategy = self.name(),
            chat_id = %config.chat_id(),
            text_len = text.len(),
            timeout_secs = config.timeout_secs(),
            "Sending message"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(config.send_message_url())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .timeout(config.timeout())
            .body(body)
            .send()
            .map_err(|e| {
                // the URL carries the bot token
                let e = e.without_url();
                warn!(strategy = self.name(), error = %e, "Request failed");
                Error::Transport(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| Error::Transport(format!("Failed to read response: {}", e.without_url())))?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if status != 200 {
            let description = ApiResponse::parse(&body).into_description();
            warn!(strategy = self.name(), status, %description, elapsed_ms, "Bot API rejected message");
            return Err(Error::Backend {
                description,
                status: Some(status),
            });
        }

        let parsed = ApiResponse::parse(&body);
        if !parsed.ok {
            let description = parsed.into_description();
            warn!(strategy = self.name(), %description, elapsed_ms, "Bot API returned ok=false");
            return Err(Error::Backend {
                description,
                status: None,
            });
        }

        debug!(strategy = self.name(), chat_id = %config.chat_id(), elapsed_ms, "Message delivered");
        Ok(true)
    }

    fn with_defaults() -> Result<Self> {
        Self::new()
    }
}
