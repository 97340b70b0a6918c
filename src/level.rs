//! Log levels
//!
//! Levels only drive presentation (emoji, color). The formatter accepts any
//! string as a level so callers can register their own; `Level` covers the
//! built-in vocabulary used by the convenience methods.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    #[default]
    Info,
    Warning,
    Error,
    Success,
    Debug,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Success,
        Level::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Success => "SUCCESS",
            Level::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Level {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Level {
    type Err = String;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = normalize_level(s);
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == upper)
            .ok_or_else(|| format!("unknown level: {}", s))
    }
}

/// Lookup key for a level name
pub fn normalize_level(level: &str) -> String {
    level.to_uppercase()
}
