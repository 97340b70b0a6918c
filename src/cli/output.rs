//! Output formatting for CLI commands

use crate::config::{mask_token, ConfigOptions, TelegramConfig};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

/// `check` command arguments
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

/// Validated config as shown to the user (token masked)
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub bot_token: String,
    pub chat_id: String,
    pub parse_mode: String,
    pub timeout_secs: u64,
    pub message_thread_id: Option<i64>,
    pub endpoint: String,
}

impl From<&TelegramConfig> for ConfigSummary {
    fn from(config: &TelegramConfig) -> Self {
        Self {
            bot_token: mask_token(config.bot_token()),
            chat_id: config.chat_id().to_string(),
            parse_mode: config.parse_mode().to_string(),
            timeout_secs: config.timeout_secs(),
            message_thread_id: config.message_thread_id(),
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.api_base_url().as_str().trim_end_matches('/'),
                mask_token(config.bot_token())
            ),
        }
    }
}

/// Format output as JSON or plain `key: value` lines
pub fn format_output<T: Serialize>(data: &T, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
    }

    match serde_json::to_value(data) {
        Ok(serde_json::Value::Object(map)) => map
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => format!("{}: {}", key, s),
                serde_json::Value::Null => format!("{}: -", key),
                other => format!("{}: {}", key, other),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string()),
    }
}

pub fn handle_check(options: ConfigOptions, args: CheckArgs) -> Result<()> {
    let config = TelegramConfig::from_options(options).context("Invalid configuration")?;
    println!("{}", format_output(&ConfigSummary::from(&config), args.json));
    Ok(())
}
