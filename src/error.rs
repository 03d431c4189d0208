use std::io;

/// Custom error type for release_relay operations
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Secret '{name}' could not be resolved: {message}")]
    SecretUnavailable { name: String, message: String },

    #[error("Secret '{secret}' is missing required key '{key}'")]
    SecretKeyMissing { secret: String, key: String },

    #[error("Build trigger returned status {status}")]
    DispatchStatus { status: u16 },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no Slack token configured")]
    MissingSlackToken,

    #[error("Notification failed: {0}")]
    NotifyFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Helper type for Results that use RelayError
pub type Result<T> = std::result::Result<T, RelayError>;
