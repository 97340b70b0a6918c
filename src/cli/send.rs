//! `tglog send` / `tglog card`

use crate::config::{ConfigOptions, ParseMode, TelegramConfig};
use crate::formatter::{escape_html, escape_markdown, FormatOptions};
use crate::logger::{AsyncTelegramLogger, TelegramLogger};
use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

/// `send` command arguments
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Message text
    pub message: String,
    /// Level (INFO, WARNING, ERROR, SUCCESS, DEBUG or a custom one)
    #[arg(long, short, default_value = "INFO")]
    pub level: String,
    /// Leave out the timestamp line
    #[arg(long)]
    pub no_timestamp: bool,
    /// Leave out the level emoji
    #[arg(long)]
    pub no_emoji: bool,
    /// Leave out the [LEVEL] tag
    #[arg(long)]
    pub no_level: bool,
    /// Escape the message for the configured parse mode
    #[arg(long)]
    pub escape: bool,
    /// Fire-and-forget: do not wait for the Bot API response
    #[arg(long = "async")]
    pub best_effort: bool,
}

impl SendArgs {
    fn format_options(&self) -> FormatOptions {
        FormatOptions::new()
            .with_timestamp(!self.no_timestamp)
            .with_emoji(!self.no_emoji)
            .with_level(!self.no_level)
    }
}

/// `card` command arguments
#[derive(Args, Debug)]
pub struct CardArgs {
    /// Card title
    pub title: String,
    /// Message text
    pub message: String,
    #[arg(long, short, default_value = "INFO")]
    pub level: String,
    /// Extra field as KEY=VALUE (repeatable, kept in order)
    #[arg(long = "field", short = 'f', value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
    /// Escape title, message and fields for the configured parse mode
    #[arg(long)]
    pub escape: bool,
}

/// Parse a `KEY=VALUE` pair
pub fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid field {:?}: expected KEY=VALUE", raw))?;
    if key.trim().is_empty() {
        return Err(format!("invalid field {:?}: empty key", raw));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Escape `text` for the markup dialect of `mode`
pub fn escape_for(mode: ParseMode, text: &str) -> String {
    match mode {
        ParseMode::Html => escape_html(text),
        ParseMode::Markdown | ParseMode::MarkdownV2 => escape_markdown(text),
    }
}

pub fn handle_send(options: ConfigOptions, args: SendArgs) -> Result<()> {
    let config = TelegramConfig::from_options(options).context("Invalid configuration")?;
    let message = if args.escape {
        escape_for(config.parse_mode(), &args.message)
    } else {
        args.message.clone()
    };
    let format_options = args.format_options();

    if args.best_effort {
        let logger = AsyncTelegramLogger::new(config)?;
        logger.log_with_options(&message, &args.level, &format_options)?;
        info!(level = %args.level, "Message written (not confirmed)");
    } else {
        let logger = TelegramLogger::new(config)?;
        logger.log_with_options(&message, &args.level, &format_options)?;
        info!(level = %args.level, "Message delivered");
    }
    Ok(())
}

pub fn handle_card(options: ConfigOptions, args: CardArgs) -> Result<()> {
    let config = TelegramConfig::from_options(options).context("Invalid configuration")?;
    let mode = config.parse_mode();
    let prepare = |text: &str| {
        if args.escape {
            escape_for(mode, text)
        } else {
            text.to_string()
        }
    };

    let fields: Vec<(String, String)> = args
        .fields
        .iter()
        .map(|(key, value)| (prepare(key), prepare(value)))
        .collect();

    let logger = TelegramLogger::new(config)?;
    logger.log_card(&prepare(&args.title), &prepare(&args.message), &args.level, fields)?;
    info!(level = %args.level, title = %args.title, "Card delivered");
    Ok(())
}
