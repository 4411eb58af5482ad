//! Error types shared by every stage of the relay.

use thiserror::Error;

/// Everything that can go wrong while fetching, rendering, delivering or
/// persisting.
#[derive(Error, Debug)]
pub enum RelayError {
    /// A required setting is missing from the environment.
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O error (watermark read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The watermark file exists but does not hold a timestamp.
    #[error("invalid watermark {value:?}: {source}")]
    Watermark {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed could not be retrieved or parsed.
    #[error("feed error: {0}")]
    Feed(String),

    /// Discord answered with a non-success status.
    #[error("Discord API error ({status}): {body}")]
    Discord {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("channel {0} not found")]
    ChannelNotFound(String),

    #[error("channel {0} is not a text-based channel")]
    NotTextChannel(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
