//! Runtime configuration, read from the environment (and an optional `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default watermark location, relative to the working directory.
pub const DEFAULT_WATERMARK_FILE: &str = "./date.txt";

/// Default poll period (5 minutes).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token (`TOKEN`).
    pub token: Option<String>,
    /// Subreddit base URL (`REDDITURL`), e.g. `https://www.reddit.com/r/rust`.
    /// Checked per cycle so a missing value does not stop the process.
    pub reddit_url: Option<String>,
    /// Destination channel id (`CHANNEL`). Checked per delivery.
    pub channel_id: Option<String>,
    pub watermark_file: PathBuf,
    pub poll_interval: Duration,
    pub log_level: String,
    /// Problems found while reading the environment. Collected rather than
    /// logged because logging is configured from this struct.
    pub warnings: Vec<String>,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut warnings = Vec::new();

        let poll_interval_secs = match non_empty("POLL_INTERVAL_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warnings.push(format!(
                        "Ignoring invalid POLL_INTERVAL_SECS={raw:?}, using {DEFAULT_POLL_INTERVAL_SECS}"
                    ));
                    DEFAULT_POLL_INTERVAL_SECS
                }
            },
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        Self {
            token: non_empty("TOKEN"),
            reddit_url: non_empty("REDDITURL"),
            channel_id: non_empty("CHANNEL"),
            watermark_file: non_empty("WATERMARK_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WATERMARK_FILE)),
            poll_interval: Duration::from_secs(poll_interval_secs),
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            warnings,
        }
    }
}
