//! Logger facade - formatter + delivery strategy bound to one config
//!
//! ```no_run
//! use telegram_logger::{NotifyLogger, TelegramLogger};
//!
//! let logger = TelegramLogger::with_credentials("123456:ABC-DEF", "-1001234567890")?;
//! logger.error("Database connection lost")?;
//! logger.log_card("Deploy", "v1.4.2 is live", "SUCCESS", [("Host", "web-1")])?;
//! # Ok::<(), telegram_logger::Error>(())
//! ```

use crate::config::{ConfigOptions, TelegramConfig};
use crate::delivery::{BestEffortDelivery, ConfirmedDelivery, DeliveryStrategy};
use crate::error::Result;
use crate::formatter::{FormatOptions, MessageFormatter};
use crate::level::Level;
use std::fmt::Display;

/// Level-oriented logging interface shared by every logger variant
pub trait NotifyLogger: Send + Sync {
    /// Format `message` at `level` with default options and deliver it
    fn log(&self, message: &str, level: &str) -> Result<bool>;

    fn info(&self, message: &str) -> Result<bool> {
        self.log(message, Level::Info.as_str())
    }

    fn warning(&self, message: &str) -> Result<bool> {
        self.log(message, Level::Warning.as_str())
    }

    fn error(&self, message: &str) -> Result<bool> {
        self.log(message, Level::Error.as_str())
    }

    fn success(&self, message: &str) -> Result<bool> {
        self.log(message, Level::Success.as_str())
    }

    fn debug(&self, message: &str) -> Result<bool> {
        self.log(message, Level::Debug.as_str())
    }
}

/// Logger over an arbitrary delivery strategy
#[derive(Debug, Clone)]
pub struct Logger<D> {
    config: TelegramConfig,
    formatter: MessageFormatter,
    strategy: D,
}

/// Logger that waits for the Bot API to confirm each message
pub type TelegramLogger = Logger<ConfirmedDelivery>;

/// Logger that writes each message and moves on
pub type AsyncTelegramLogger = Logger<BestEffortDelivery>;

impl<D: DeliveryStrategy> Logger<D> {
    /// Logger for an already validated config
    pub fn new(config: TelegramConfig) -> Result<Self> {
        Ok(Self::with_strategy(config, D::with_defaults()?))
    }

    /// Logger for a bot token / chat id pair with default settings
    pub fn with_credentials(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self> {
        Self::new(TelegramConfig::new(bot_token, chat_id)?)
    }

    /// Logger from a named-option mapping
    pub fn from_options(options: ConfigOptions) -> Result<Self> {
        Self::new(TelegramConfig::from_options(options)?)
    }

    pub fn with_strategy(config: TelegramConfig, strategy: D) -> Self {
        Self {
            config,
            formatter: MessageFormatter::new(),
            strategy,
        }
    }

    /// Replace the formatter, e.g. one with custom level emojis
    pub fn with_formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// Mutable config; its setters validate every change
    pub fn config_mut(&mut self) -> &mut TelegramConfig {
        &mut self.config
    }

    pub fn formatter(&self) -> &MessageFormatter {
        &self.formatter
    }

    pub fn formatter_mut(&mut self) -> &mut MessageFormatter {
        &mut self.formatter
    }

    pub fn strategy(&self) -> &D {
        &self.strategy
    }

    pub fn log_with_options(&self, message: &str, level: &str, options: &FormatOptions) -> Result<bool> {
        let text = self.formatter.format(message, level, options);
        self.strategy.deliver(&self.config, &text)
    }
}

impl Logger<ConfirmedDelivery> {
    /// Send a structured card.
    ///
    /// Only available with confirmed delivery.
    pub fn log_card<I, K, V>(&self, title: &str, message: &str, level: &str, fields: I) -> Result<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        let text = self.formatter.format_card(title, message, level, fields);
        self.strategy.deliver(&self.config, &text)
    }
}

impl<D: DeliveryStrategy> NotifyLogger for Logger<D> {
    fn log(&self, message: &str, level: &str) -> Result<bool> {
        self.log_with_options(message, level, &FormatOptions::default())
    }
}
