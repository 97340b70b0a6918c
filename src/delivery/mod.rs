//! Delivery strategies - how formatted text reaches the Bot API
//!
//! Both strategies send the same form-encoded `sendMessage` request and
//! differ only in what they wait for:
//! - [`ConfirmedDelivery`]: full request/response round trip, inspects the
//!   API acknowledgement and reports backend rejections.
//! - [`BestEffortDelivery`]: writes the request over a fresh connection and
//!   closes it without reading anything back. It can only report transport
//!   failures.

pub mod best_effort;
pub mod confirmed;

pub use best_effort::BestEffortDelivery;
pub use confirmed::ConfirmedDelivery;

use crate::config::TelegramConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Form content type used by both strategies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Capability: deliver already formatted text to the configured chat
pub trait DeliveryStrategy: Send + Sync {
    /// Strategy name (for logs)
    fn name(&self) -> &str;

    /// Deliver `text` using the current state of `config`.
    ///
    /// Returns `Ok(true)` once the strategy considers the message delivered.
    /// No retries are attempted.
    fn deliver(&self, config: &TelegramConfig, text: &str) -> Result<bool>;

    /// Strategy with default settings
    fn with_defaults() -> Result<Self>
    where
        Self: Sized;
}

/// Which strategy a factory-built logger should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    #[default]
    Confirmed,
    BestEffort,
}

/// Encode the `sendMessage` form body.
///
/// `message_thread_id` is only present when the config has one.
pub fn encode_send_message(config: &TelegramConfig, text: &str) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("chat_id", config.chat_id())
        .append_pair("text", text)
        .append_pair("parse_mode", config.parse_mode().as_str());
    if let Some(thread_id) = config.message_thread_id() {
        form.append_pair("message_thread_id", &thread_id.to_string());
    }
    form.finish()
}
