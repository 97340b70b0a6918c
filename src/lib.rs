//! Telegram Logger - send formatted log notifications to a Telegram chat
//!
//! Two delivery modes:
//! - [`TelegramLogger`]: waits for the Bot API response and reports
//!   rejections as [`Error::Backend`].
//! - [`AsyncTelegramLogger`]: writes the request and returns without reading
//!   the response; only connection failures are reported.

pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod level;
pub mod logger;

pub use config::{ConfigOptions, ParseMode, TelegramConfig};
pub use delivery::{BestEffortDelivery, ConfirmedDelivery, DeliveryMode, DeliveryStrategy};
pub use error::{ConfigError, Error, Result};
pub use factory::LoggerFactory;
pub use formatter::{escape_html, escape_markdown, FormatOptions, MessageFormatter};
pub use level::Level;
pub use logger::{AsyncTelegramLogger, Logger, NotifyLogger, TelegramLogger};
