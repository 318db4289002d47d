//! Error types for panel navigation and radio playback

/// Text shown to the user whenever a stream cannot be played
pub const STREAM_ERROR_MESSAGE: &str = "Can't play stream";

/// Result type alias for pitlane operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the site state
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A stream could not be started or stopped playing unexpectedly.
    /// The reason is kept for the logs, users only ever see the fixed text.
    #[error("Can't play stream")]
    StreamUnavailable { reason: String },

    /// Panel name did not match any overlay
    #[error("Unknown panel: {0}")]
    UnknownPanel(String),

    /// Station lookup by index or URL failed
    #[error("Station not found: {0}")]
    StationNotFound(String),

    /// Volume was not a number
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// Station list has no entries
    #[error("Station list is empty")]
    EmptyStationList,

    /// Two stations share the same stream URL
    #[error("Duplicate station URL: {0}")]
    DuplicateStation(String),

    /// Station URL is not an absolute http(s) URL
    #[error("Invalid station URL {url}: {reason}")]
    InvalidStationUrl { url: String, reason: String },

    /// A state mutex was poisoned by a panicking holder
    #[error("Failed to lock {0} state")]
    StatePoisoned(&'static str),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failed
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a stream-unavailable error from any displayable reason
    pub fn stream_unavailable(reason: impl ToString) -> Self {
        Self::StreamUnavailable {
            reason: reason.to_string(),
        }
    }
}
