use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from downloading (§4.C) and installing (§4.D) a release.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network error downloading {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("mirror returned HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("version {version} is not available for this platform")]
    VersionNotAvailable { version: String },

    #[error("no artifact published for os={os} arch={arch}")]
    NoArtifactForPlatform { os: String, arch: String },

    #[error("checksum mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    #[error("{version} is already installed at {path}")]
    AlreadyInstalled { version: String, path: PathBuf },

    #[error("install of {version} is corrupt: {reason}")]
    CorruptInstall { version: String, reason: String },

    #[error("unsupported archive format for {filename}")]
    UnsupportedFormat { filename: String },

    #[error("failed to uninstall {version} after {attempts} attempts: {reason}")]
    UninstallFailed {
        version: String,
        attempts: u32,
        reason: String,
    },

    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Transient download errors are retried by the caller's backoff loop.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Network { .. } => true,
            Error::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
