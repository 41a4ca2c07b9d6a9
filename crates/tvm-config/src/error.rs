use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors from loading, validating or persisting configuration (§7 `ConfigError`/`ValidationError`).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config at {path} is not valid JSON: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode config for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Validation(String),
}
