//! Logger configuration
//!
//! `TelegramConfig` is validated eagerly: construction fails before any
//! network use if the bot token or chat id is empty, the parse mode is not
//! one of `HTML` / `Markdown` / `MarkdownV2`, or the timeout is not
//! a positive number of seconds up to one day. Setters validate the new value before touching the field, so
//! a failed set leaves the previous value in place.
//!
//! Where the options come from (JSON file, env, hand-built struct) is the
//! caller's business; see `ConfigOptions`.

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default Bot API host
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: i64 = 30;

/// Largest accepted request timeout (one day)
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Markup dialect the Bot API should use to render the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParseMode {
    #[default]
    #[serde(rename = "HTML")]
    Html,
    Markdown,
    MarkdownV2,
}

impl ParseMode {
    pub const ALL: [ParseMode; 3] = [ParseMode::Html, ParseMode::Markdown, ParseMode::MarkdownV2];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
            ParseMode::Markdown => "Markdown",
            ParseMode::MarkdownV2 => "MarkdownV2",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = ConfigError;

    /// Names are matched exactly, the way the Bot API spells them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParseMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidParseMode(s.to_string()))
    }
}

/// Named-option mapping used to build a [`TelegramConfig`].
///
/// Deserializes from the same keys a JSON config file uses:
///
/// ```json
/// {
///   "bot_token": "123456:ABC",
///   "chat_id": -1001234567890,
///   "parse_mode": "HTML",
///   "timeout": 30,
///   "message_thread_id": 42
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOptions {
    pub bot_token: String,
    #[serde(deserialize_with = "string_or_integer")]
    pub chat_id: String,
    pub parse_mode: Option<String>,
    pub timeout: Option<i64>,
    #[serde(alias = "thread_id")]
    pub message_thread_id: Option<i64>,
    pub api_base_url: Option<String>,
}

impl ConfigOptions {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            ..Default::default()
        }
    }

    /// Overlay every key that is set in `other` on top of `self`
    pub fn merge(mut self, other: ConfigOptions) -> Self {
        if !other.bot_token.is_empty() {
            self.bot_token = other.bot_token;
        }
        if !other.chat_id.is_empty() {
            self.chat_id = other.chat_id;
        }
        if other.parse_mode.is_some() {
            self.parse_mode = other.parse_mode;
        }
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.message_thread_id.is_some() {
            self.message_thread_id = other.message_thread_id;
        }
        if other.api_base_url.is_some() {
            self.api_base_url = other.api_base_url;
        }
        self
    }
}

/// Chat ids are often written as bare numbers in config files.
fn string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

/// Validated delivery parameters
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    bot_token: String,
    chat_id: String,
    parse_mode: ParseMode,
    timeout_secs: u64,
    message_thread_id: Option<i64>,
    api_base_url: Url,
}

impl TelegramConfig {
    /// Config with default parse mode, timeout and endpoint
    pub fn new(
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::from_options(ConfigOptions::new(bot_token, chat_id))
    }

    pub fn from_options(options: ConfigOptions) -> Result<Self, ConfigError> {
        let ConfigOptions {
            bot_token,
            chat_id,
            parse_mode,
            timeout,
            message_thread_id,
            api_base_url,
        } = options;

        if bot_token.is_empty() {
            return Err(ConfigError::MissingBotToken);
        }
        validate_chat_id(&chat_id)?;

        let parse_mode = match parse_mode {
            Some(mode) => mode.parse()?,
            None => ParseMode::default(),
        };
        let timeout_secs = validate_timeout(timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))?;
        let api_base_url =
            parse_api_base_url(api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL))?;

        Ok(Self {
            bot_token,
            chat_id,
            parse_mode,
            timeout_secs,
            message_thread_id,
            api_base_url,
        })
    }

    /// Build from an arbitrary key/value mapping (e.g. a parsed JSON object).
    ///
    /// Values of the wrong shape are rejected as the field they belong to,
    /// so `{"timeout": "soon"}` is a timeout error, not a parse error.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let get_str = |key: &str| -> Option<String> {
            match value.get(key)? {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };

        let timeout = match value.get("timeout") {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(v.as_i64().ok_or(ConfigError::NonPositiveTimeout(0))?),
        };
        let message_thread_id = match value.get("message_thread_id").or_else(|| value.get("thread_id")) {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(
                s.trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidThreadId(s.clone()))?,
            ),
            Some(v) => Some(v.as_i64().ok_or_else(|| ConfigError::InvalidThreadId(v.to_string()))?),
        };

        Self::from_options(ConfigOptions {
            bot_token: get_str("bot_token").unwrap_or_default(),
            chat_id: get_str("chat_id").unwrap_or_default(),
            parse_mode: get_str("parse_mode"),
            timeout,
            message_thread_id,
            api_base_url: get_str("api_base_url"),
        })
    }

    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn parse_mode(&self) -> ParseMode {
        self.parse_mode
    }

    /// Timeout in seconds, always > 0
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn message_thread_id(&self) -> Option<i64> {
        self.message_thread_id
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    /// `sendMessage` endpoint for this bot
    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base_url.as_str().trim_end_matches('/'),
            self.bot_token
        )
    }

    pub fn set_chat_id(&mut self, chat_id: impl Into<String>) -> Result<(), ConfigError> {
        let chat_id = chat_id.into();
        validate_chat_id(&chat_id)?;
        self.chat_id = chat_id;
        Ok(())
    }

    pub fn set_parse_mode(&mut self, parse_mode: ParseMode) {
        self.parse_mode = parse_mode;
    }

    /// Set the parse mode from its Bot API name
    pub fn set_parse_mode_str(&mut self, parse_mode: &str) -> Result<(), ConfigError> {
        self.parse_mode = parse_mode.parse()?;
        Ok(())
    }

    pub fn set_timeout(&mut self, timeout_secs: i64) -> Result<(), ConfigError> {
        self.timeout_secs = validate_timeout(timeout_secs)?;
        Ok(())
    }

    pub fn set_message_thread_id(&mut self, thread_id: Option<i64>) {
        self.message_thread_id = thread_id;
    }
}

// The token is a credential; keep it out of debug output and logs.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &mask_token(&self.bot_token))
            .field("chat_id", &self.chat_id)
            .field("parse_mode", &self.parse_mode)
            .field("timeout_secs", &self.timeout_secs)
            .field("message_thread_id", &self.message_thread_id)
            .field("api_base_url", &self.api_base_url.as_str())
            .finish()
    }
}

/// Show only the bot id part of a token (`123456:***`)
pub fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{}:***", bot_id),
        None => "***".to_string(),
    }
}

fn validate_chat_id(chat_id: &str) -> Result<(), ConfigError> {
    if chat_id.is_empty() {
        return Err(ConfigError::MissingChatId);
    }
    Ok(())
}

fn validate_timeout(timeout: i64) -> Result<u64, ConfigError> {
    if timeout <= 0 {
        return Err(ConfigError::NonPositiveTimeout(timeout));
    }
    if timeout > MAX_TIMEOUT_SECS as i64 {
        return Err(ConfigError::TimeoutTooLarge(timeout));
    }
    Ok(timeout as u64)
}

fn parse_api_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidApiBaseUrl(format!("{}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidApiBaseUrl(raw.to_string()));
    }
    Ok(url)
}
