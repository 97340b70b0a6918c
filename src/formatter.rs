//! Message formatting - turns a log line or a card into Bot API text
//!
//! Output uses HTML bold tags (`<b>`) for the level tag and card labels.
//! The message body, title and field values are inserted verbatim; escape
//! them first with [`escape_html`] / [`escape_markdown`] if they may contain
//! markup.
//!
//! Emoji and color tables are per-instance and can be extended at runtime:
//!
//! ```
//! use telegram_logger::MessageFormatter;
//!
//! let mut formatter = MessageFormatter::new();
//! formatter.set_level_emoji("deploy", "🚀");
//! assert_eq!(formatter.level_emoji("DEPLOY"), "🚀");
//! ```

use crate::level::normalize_level;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// `YYYY-MM-DD HH:MM:SS`, local time
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Emoji used when a level has no entry
pub const DEFAULT_EMOJI: &str = "ℹ️";

/// Color used when a level has no entry
pub const DEFAULT_COLOR: &str = "#2196F3";

const DEFAULT_EMOJIS: [(&str, &str); 5] = [
    ("INFO", "ℹ️"),
    ("WARNING", "⚠️"),
    ("ERROR", "❌"),
    ("SUCCESS", "✅"),
    ("DEBUG", "🐛"),
];

const DEFAULT_COLORS: [(&str, &str); 5] = [
    ("INFO", "#2196F3"),
    ("WARNING", "#FF9800"),
    ("ERROR", "#F44336"),
    ("SUCCESS", "#4CAF50"),
    ("DEBUG", "#9C27B0"),
];

/// Card decorations
mod decor {
    pub const CLOCK: &str = "⏰";
    pub const MEMO: &str = "📝";
    pub const BULLET: &str = "•";
    pub const MESSAGE_LABEL: &str = "Message:";
    pub const FIELDS_LABEL: &str = "Additional information:";
}

/// Markdown characters escaped by [`escape_markdown`], in replacement order
pub const MARKDOWN_SPECIAL_CHARS: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Toggles for [`MessageFormatter::format`]; everything is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub include_timestamp: bool,
    pub include_emoji: bool,
    pub include_level: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            include_timestamp: true,
            include_emoji: true,
            include_level: true,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    pub fn with_emoji(mut self, include: bool) -> Self {
        self.include_emoji = include;
        self
    }

    pub fn with_level(mut self, include: bool) -> Self {
        self.include_level = include;
        self
    }
}

/// Message formatter with mutable level lookup tables
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    level_emojis: HashMap<String, String>,
    level_colors: HashMap<String, String>,
}

impl MessageFormatter {
    pub fn new() -> Self {
        Self {
            level_emojis: to_table(&DEFAULT_EMOJIS),
            level_colors: to_table(&DEFAULT_COLORS),
        }
    }

    /// Format a single log line.
    ///
    /// Segments in order: emoji, `<b>[LEVEL]</b>`, timestamp, message. The
    /// level tag shows the level exactly as given; only the emoji lookup is
    /// case-insensitive.
    pub fn format(&self, message: &str, level: &str, options: &FormatOptions) -> String {
        self.format_with_timestamp(message, level, options, &current_timestamp())
    }

    fn format_with_timestamp(
        &self,
        message: &str,
        level: &str,
        options: &FormatOptions,
        timestamp: &str,
    ) -> String {
        let mut formatted = String::with_capacity(message.len() + 64);

        if options.include_emoji {
            formatted.push_str(self.level_emoji(level));
            formatted.push(' ');
        }

        if options.include_level {
            formatted.push_str(&format!("<b>[{}]</b> ", level));
        }

        if options.include_timestamp {
            formatted.push_str(timestamp);
            formatted.push('\n');
        }

        formatted.push_str(message);
        formatted
    }

    /// Format a structured card.
    ///
    /// Always renders the emoji + title, timestamp and message; the
    /// "Additional information" block follows only when `fields` is
    /// non-empty, one bullet per field in iteration order.
    pub fn format_card<I, K, V>(&self, title: &str, message: &str, level: &str, fields: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        self.format_card_with_timestamp(title, message, level, fields, &current_timestamp())
    }

    fn format_card_with_timestamp<I, K, V>(
        &self,
        title: &str,
        message: &str,
        level: &str,
        fields: I,
        timestamp: &str,
    ) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        let mut card = format!("{} <b>{}</b>\n", self.level_emoji(level), title);
        card.push_str(&format!("{} {}\n", decor::CLOCK, timestamp));
        card.push_str(&format!(
            "{} <b>{}</b>\n{}\n",
            decor::MEMO,
            decor::MESSAGE_LABEL,
            message
        ));

        let lines: Vec<String> = fields
            .into_iter()
            .map(|(key, value)| format!("{} <b>{}:</b> {}\n", decor::BULLET, key, value))
            .collect();

        if !lines.is_empty() {
            card.push_str(&format!("\n<b>{}</b>\n", decor::FIELDS_LABEL));
            for line in lines {
                card.push_str(&line);
            }
        }

        card
    }

    /// Emoji for a level (case-insensitive), INFO emoji if unknown
    pub fn level_emoji(&self, level: &str) -> &str {
        self.level_emojis
            .get(&normalize_level(level))
            .map(String::as_str)
            .unwrap_or(DEFAULT_EMOJI)
    }

    /// Color for a level (case-insensitive), INFO color if unknown
    pub fn level_color(&self, level: &str) -> &str {
        self.level_colors
            .get(&normalize_level(level))
            .map(String::as_str)
            .unwrap_or(DEFAULT_COLOR)
    }

    /// Insert or replace the emoji for a level
    pub fn set_level_emoji(&mut self, level: &str, emoji: impl Into<String>) {
        self.level_emojis.insert(normalize_level(level), emoji.into());
    }

    /// Insert or replace the color for a level
    pub fn set_level_color(&mut self, level: &str, color: impl Into<String>) {
        self.level_colors.insert(normalize_level(level), color.into());
    }

    pub fn escape_html(&self, text: &str) -> String {
        escape_html(text)
    }

    pub fn escape_markdown(&self, text: &str) -> String {
        escape_markdown(text)
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn to_table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(level, value)| (level.to_string(), value.to_string()))
        .collect()
}

fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Escape `& < > " '` as HTML entities
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Backslash-escape Markdown special characters.
///
/// One replacement pass per character of [`MARKDOWN_SPECIAL_CHARS`], in
/// order. Backslash is not in the set, so inserted backslashes are never
/// escaped again.
pub fn escape_markdown(text: &str) -> String {
    MARKDOWN_SPECIAL_CHARS
        .iter()
        .fold(text.to_string(), |acc, c| {
            acc.replace(*c, &format!("\\{}", c))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2024-05-01 12:34:56";

    #[test]
    fn test_format_all_segments() {
        let formatter = MessageFormatter::new();
        let text = formatter.format_with_timestamp("Hello", "ERROR", &FormatOptions::default(), TS);
        assert_eq!(text, "❌ <b>[ERROR]</b> 2024-05-01 12:34:56\nHello");
    }

    #[test]
    fn test_format_without_timestamp_and_emoji() {
        let formatter = MessageFormatter::new();
        let options = FormatOptions::new().with_timestamp(false).with_emoji(false);
        let text = formatter.format_with_timestamp("Hello", "ERROR", &options, TS);
        assert_eq!(text, "<b>[ERROR]</b> Hello");
    }

    #[test]
    fn test_format_message_only() {
        let formatter = MessageFormatter::new();
        let options = FormatOptions::new()
            .with_timestamp(false)
            .with_emoji(false)
            .with_level(false);
        assert_eq!(formatter.format("raw <i>text</i>", "INFO", &options), "raw <i>text</i>");
    }

    #[test]
    fn test_format_keeps_level_text_as_typed() {
        let formatter = MessageFormatter::new();
        let options = FormatOptions::new().with_timestamp(false);
        let text = formatter.format("x", "custom", &options);
        assert_eq!(text, "ℹ️ <b>[custom]</b> x");

        let text = formatter.format("x", "warning", &options);
        assert_eq!(text, "⚠️ <b>[warning]</b> x");
    }

    #[test]
    fn test_format_card_with_fields() {
        let formatter = MessageFormatter::new();
        let text = formatter.format_card_with_timestamp(
            "Deploy",
            "Finished",
            "SUCCESS",
            [("User", "admin"), ("Build", "42")],
            TS,
        );
        assert_eq!(
            text,
            "✅ <b>Deploy</b>\n\
             ⏰ 2024-05-01 12:34:56\n\
             📝 <b>Message:</b>\nFinished\n\
             \n<b>Additional information:</b>\n\
             • <b>User:</b> admin\n\
             • <b>Build:</b> 42\n"
        );
    }

    #[test]
    fn test_format_card_without_fields() {
        let formatter = MessageFormatter::new();
        let fields: Vec<(String, String)> = Vec::new();
        let text = formatter.format_card_with_timestamp("T", "M", "ERROR", fields, TS);
        assert_eq!(text, "❌ <b>T</b>\n⏰ 2024-05-01 12:34:56\n📝 <b>Message:</b>\nM\n");
        assert!(!text.contains(decor::FIELDS_LABEL));
    }

    #[test]
    fn test_format_card_field_values_use_display() {
        let formatter = MessageFormatter::new();
        let text = formatter.format_card("T", "M", "INFO", vec![("Attempts", 3)]);
        assert!(text.contains("• <b>Attempts:</b> 3\n"));
    }

    #[test]
    fn test_level_emoji_defaults() {
        let formatter = MessageFormatter::new();
        assert_eq!(formatter.level_emoji("INFO"), "ℹ️");
        assert_eq!(formatter.level_emoji("WARNING"), "⚠️");
        assert_eq!(formatter.level_emoji("ERROR"), "❌");
        assert_eq!(formatter.level_emoji("SUCCESS"), "✅");
        assert_eq!(formatter.level_emoji("DEBUG"), "🐛");
    }

    #[test]
    fn test_level_emoji_case_insensitive_and_fallback() {
        let formatter = MessageFormatter::new();
        let expected = formatter.level_emoji("WARNING");
        assert_eq!(formatter.level_emoji("warning"), expected);
        assert_eq!(formatter.level_emoji("Warning"), expected);
        assert_eq!(formatter.level_emoji("totally-unknown"), DEFAULT_EMOJI);
    }

    #[test]
    fn test_level_color_lookup() {
        let formatter = MessageFormatter::new();
        assert_eq!(formatter.level_color("error"), "#F44336");
        assert_eq!(formatter.level_color("Success"), "#4CAF50");
        assert_eq!(formatter.level_color("nope"), DEFAULT_COLOR);
    }

    #[test]
    fn test_register_level_entries() {
        let mut formatter = MessageFormatter::new();
        formatter.set_level_emoji("critical", "🔥");
        formatter.set_level_color("Critical", "#000000");
        formatter.set_level_emoji("info", "💡");

        assert_eq!(formatter.level_emoji("CRITICAL"), "🔥");
        assert_eq!(formatter.level_color("critical"), "#000000");
        assert_eq!(formatter.level_emoji("INFO"), "💡");
        // fallback is fixed, not the (replaced) INFO entry
        assert_eq!(formatter.level_emoji("unknown"), DEFAULT_EMOJI);
    }

    #[test]
    fn test_tables_are_per_instance() {
        let mut first = MessageFormatter::new();
        let second = MessageFormatter::new();
        first.set_level_emoji("audit", "🔍");
        assert_eq!(first.level_emoji("audit"), "🔍");
        assert_eq!(second.level_emoji("audit"), DEFAULT_EMOJI);
    }

    #[test]
    fn test_escape_html() {
        let escaped = escape_html("<script>alert(\"x\")</script>");
        assert_eq!(escaped, "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;");
        assert_eq!(escape_html("Tom & 'Jerry'"), "Tom &amp; &apos;Jerry&apos;");
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("*bold* _it_"), "\\*bold\\* \\_it\\_");
        assert_eq!(escape_markdown("v1.2-rc!"), "v1\\.2\\-rc\\!");
        assert_eq!(escape_markdown("[a](b)"), "\\[a\\]\\(b\\)");
        assert_eq!(escape_markdown("plain text"), "plain text");
    }

    #[test]
    fn test_escape_markdown_does_not_touch_backslash() {
        assert_eq!(escape_markdown("a\\b"), "a\\b");
        assert_eq!(escape_markdown("\\*"), "\\\\*");
    }

    #[test]
    fn test_format_options_deserialize_partial() {
        let options: FormatOptions = serde_json::from_str(r#"{"include_emoji": false}"#).unwrap();
        assert!(options.include_timestamp);
        assert!(!options.include_emoji);
        assert!(options.include_level);
    }
}
