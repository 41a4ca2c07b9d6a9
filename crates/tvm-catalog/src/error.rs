pub type Result<T> = std::result::Result<T, Error>;

/// Errors from fetching and decoding the mirror catalog (§4.B, §7).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network error talking to {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("mirror returned HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("could not decode catalog payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("checksum database disagreement for {filename}: catalog says {primary}, db says {secondary}")]
    ChecksumDb {
        filename: String,
        primary: String,
        secondary: String,
    },
}

impl Error {
    /// Transient errors are retried by the caller; a terminal 4xx or a
    /// decode failure is not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Network { .. } => true,
            Error::Http { status, .. } => *status >= 500,
            Error::Decode { .. } | Error::ChecksumDb { .. } => false,
        }
    }
}
