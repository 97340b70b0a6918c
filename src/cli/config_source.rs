//! Config loading for the CLI
//!
//! Sources, lowest priority first:
//! 1. JSON file (`--config <PATH>`, else `~/.config/tglog.json` if present)
//! 2. Environment variables `TELEGRAM_*`

use crate::config::ConfigOptions;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_PARSE_MODE: &str = "TELEGRAM_PARSE_MODE";
pub const ENV_TIMEOUT: &str = "TELEGRAM_TIMEOUT";
pub const ENV_THREAD_ID: &str = "TELEGRAM_THREAD_ID";
pub const ENV_API_BASE_URL: &str = "TELEGRAM_API_BASE_URL";

/// `~/.config/tglog.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/tglog.json"))
}

/// Read options from a JSON config file
pub fn load_options_from_file(path: &Path) -> Result<ConfigOptions> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {}
        Some(other) => bail!("Unsupported configuration file format: {}", other),
        None => bail!("Configuration file has no extension: {}", path.display()),
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Configuration file not found: {}", path.display()))?;
    let options: ConfigOptions = serde_json::from_str(&content)
        .with_context(|| format!("Invalid configuration format: {}", path.display()))?;

    debug!(path = %path.display(), "Loaded configuration file");
    Ok(options)
}

/// Options from `TELEGRAM_*` variables; `lookup` returns a variable's value
pub fn options_from_vars<F>(lookup: F) -> Result<ConfigOptions>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let parse_int = |key: &str| -> Result<Option<i64>> {
        get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .with_context(|| format!("{} must be an integer, got {:?}", key, raw))
            })
            .transpose()
    };

    Ok(ConfigOptions {
        bot_token: get(ENV_BOT_TOKEN).unwrap_or_default(),
        chat_id: get(ENV_CHAT_ID).unwrap_or_default(),
        parse_mode: get(ENV_PARSE_MODE),
        timeout: parse_int(ENV_TIMEOUT)?,
        message_thread_id: parse_int(ENV_THREAD_ID)?,
        api_base_url: get(ENV_API_BASE_URL),
    })
}

/// Merge file and environment into one option set.
///
/// An explicit path must exist; the default path is skipped when absent.
pub fn resolve_options(explicit: Option<&Path>) -> Result<ConfigOptions> {
    let from_file = match explicit {
        Some(path) => load_options_from_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_options_from_file(&path)?,
            _ => ConfigOptions::default(),
        },
    };

    let from_env = options_from_vars(|key| std::env::var(key).ok())?;
    Ok(from_file.merge(from_env))
}
