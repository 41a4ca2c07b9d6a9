use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the on-disk layout, link indirection and process lock.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to update link directory entry {path}: {reason}")]
    LinkFailed { path: PathBuf, reason: String },

    #[error("could not acquire process lock at {path} within {timeout_secs}s")]
    Busy { path: PathBuf, timeout_secs: u64 },

    #[error("could not determine home directory for this platform")]
    NoHomeDir,
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
