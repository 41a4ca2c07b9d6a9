pub type Result<T> = std::result::Result<T, Error>;

/// Errors from system-toolchain detection (§4.E). Detection failing to find
/// anything is not an error — these only cover I/O-level failures while
/// probing candidates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to execute candidate at {path}: {source}")]
    Exec {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
