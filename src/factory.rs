//! Logger factory - build a boxed logger from whatever config shape is at hand

use crate::config::{ConfigOptions, TelegramConfig};
use crate::delivery::{BestEffortDelivery, ConfirmedDelivery, DeliveryMode};
use crate::error::Result;
use crate::logger::{Logger, NotifyLogger};
use tracing::debug;

pub struct LoggerFactory;

impl LoggerFactory {
    /// Confirmed-delivery logger. `bot_token` and `chat_id` are defaults:
    /// a non-empty token or chat id in `options` takes precedence.
    pub fn create_sync_logger(
        bot_token: &str,
        chat_id: &str,
        options: ConfigOptions,
    ) -> Result<Box<dyn NotifyLogger>> {
        Self::create_with_credentials(bot_token, chat_id, options, DeliveryMode::Confirmed)
    }

    /// Best-effort logger; same option handling as [`Self::create_sync_logger`]
    pub fn create_async_logger(
        bot_token: &str,
        chat_id: &str,
        options: ConfigOptions,
    ) -> Result<Box<dyn NotifyLogger>> {
        Self::create_with_credentials(bot_token, chat_id, options, DeliveryMode::BestEffort)
    }

    pub fn create_from_config(config: TelegramConfig, mode: DeliveryMode) -> Result<Box<dyn NotifyLogger>> {
        debug!(?mode, chat_id = %config.chat_id(), "Creating logger");
        let logger: Box<dyn NotifyLogger> = match mode {
            DeliveryMode::Confirmed => Box::new(Logger::<ConfirmedDelivery>::new(config)?),
            DeliveryMode::BestEffort => Box::new(Logger::<BestEffortDelivery>::new(config)?),
        };
        Ok(logger)
    }

    pub fn create_from_options(options: ConfigOptions, mode: DeliveryMode) -> Result<Box<dyn NotifyLogger>> {
        Self::create_from_config(TelegramConfig::from_options(options)?, mode)
    }

    /// Build from a key/value mapping such as a parsed JSON config file
    pub fn create_from_value(value: &serde_json::Value, mode: DeliveryMode) -> Result<Box<dyn NotifyLogger>> {
        Self::create_from_config(TelegramConfig::from_value(value)?, mode)
    }

    fn create_with_credentials(
        bot_token: &str,
        chat_id: &str,
        options: ConfigOptions,
        mode: DeliveryMode,
    ) -> Result<Box<dyn NotifyLogger>> {
        Self::create_from_options(Self::credentials_with_options(bot_token, chat_id, options), mode)
    }

    fn credentials_with_options(bot_token: &str, chat_id: &str, mut options: ConfigOptions) -> ConfigOptions {
        if options.bot_token.is_empty() {
            options.bot_token = bot_token.to_string();
        }
        if options.chat_id.is_empty() {
            options.chat_id = chat_id.to_string();
        }
        options
    }
}
