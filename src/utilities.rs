use anyhow::{Context, Result};
use chrono::DateTime;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders an RFC 3339 timestamp as `YYYY-MM-DD HH:MM` in its own offset.
pub fn format_timestamp(published_at: &str) -> Result<String> {
    let instant = DateTime::parse_from_rfc3339(published_at)
        .with_context(|| format!("invalid timestamp {:?}", published_at))?;
    Ok(instant.format(DISPLAY_FORMAT).to_string())
}

/// Escapes the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_timestamp() {
        assert_eq!(
            format_timestamp("2024-01-01T12:00:00Z").unwrap(),
            "2024-01-01 12:00"
        );
    }

    #[test]
    fn offset_is_preserved() {
        assert_eq!(
            format_timestamp("2024-03-05T08:07:59.123+03:00").unwrap(),
            "2024-03-05 08:07"
        );
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(format_timestamp("yesterday").is_err());
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(escape_html("Tom & Jerry <3"), "Tom &amp; Jerry &lt;3");
        assert_eq!(escape_html("plain"), "plain");
    }
}
