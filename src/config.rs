use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Time between two polling cycles.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(300);

/// Number of activities requested per channel and cycle.
pub const ACTIVITY_PAGE_SIZE: u32 = 10;

pub const DEFAULT_PORT: u16 = 10000;

pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Channels to track, either by raw channel id or by `@handle`.
pub const CHANNELS_TO_MONITOR: &[&str] = &[
    "@MrBeast",       // English
    "@wylsacom",      // Russian
    "@HolaSoyGerman", // Spanish
];

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub youtube_api_key: String,
    pub port: u16,
    pub youtube_api_base: String,
    pub telegram_api_base: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// `TELEGRAM_TOKEN`, `TELEGRAM_CHAT_ID` and `YT_API_KEY` are required.
    /// `PORT` defaults to 10000.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("missing required environment variable {}", key))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            telegram_token: required("TELEGRAM_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
            youtube_api_key: required("YT_API_KEY")?,
            port,
            youtube_api_base: lookup("YT_API_BASE")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE.to_string()),
            telegram_api_base: lookup("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn port_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[
            ("TELEGRAM_TOKEN", "token"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("YT_API_KEY", "key"),
        ]))
        .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.youtube_api_base, DEFAULT_YOUTUBE_API_BASE);
        assert_eq!(config.telegram_api_base, DEFAULT_TELEGRAM_API_BASE);
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[
            ("TELEGRAM_CHAT_ID", "42"),
            ("YT_API_KEY", "key"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("TELEGRAM_TOKEN"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[
            ("TELEGRAM_TOKEN", "token"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("YT_API_KEY", "key"),
            ("PORT", "not-a-port"),
        ]));

        assert!(result.is_err());
    }

    #[test]
    fn overrides_are_honoured() {
        let config = Config::from_lookup(lookup_from(&[
            ("TELEGRAM_TOKEN", "token"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("YT_API_KEY", "key"),
            ("PORT", "8081"),
            ("YT_API_BASE", "http://127.0.0.1:9000/yt"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.youtube_api_base, "http://127.0.0.1:9000/yt");
    }
}
