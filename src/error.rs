//! Error types for configuration and delivery

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Fallback description when the Bot API response carries none
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Validation failures raised while building or mutating a [`TelegramConfig`].
///
/// These are always local to the configuration object and never wrap a
/// network error.
///
/// [`TelegramConfig`]: crate::config::TelegramConfig
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Bot token is required")]
    MissingBotToken,

    #[error("Chat ID is required")]
    MissingChatId,

    #[error("Invalid parse mode. Allowed: HTML, Markdown, MarkdownV2 (got {0:?})")]
    InvalidParseMode(String),

    #[error("Timeout must be positive integer (got {0})")]
    NonPositiveTimeout(i64),

    #[error("Timeout must not exceed {max} seconds (got {0})", max = crate::config::MAX_TIMEOUT_SECS)]
    TimeoutTooLarge(i64),

    #[error("Message thread ID must be an integer (got {0})")]
    InvalidThreadId(String),

    #[error("Invalid API base URL: {0}")]
    InvalidApiBaseUrl(String),
}

/// Errors surfaced by loggers and delivery strategies.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration invariant violated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The connection could not be established or completed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The Bot API answered but rejected the request.
    ///
    /// `status` is set when the rejection came as a non-200 HTTP status and
    /// is `None` for a 200 response whose body reported `ok: false`.
    #[error("{}", backend_message(.description, .status))]
    Backend {
        description: String,
        status: Option<u16>,
    },
}

impl Error {
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Backend { .. })
    }

    /// HTTP status of a backend rejection, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Backend { status, .. } => *status,
            _ => None,
        }
    }
}

fn backend_message(description: &str, status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("Telegram API error: {} (HTTP {})", description, code),
        None => format!("Telegram API returned error: {}", description),
    }
}
