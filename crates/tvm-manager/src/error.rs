//! The only error enum in the workspace that translates between lower
//! layers' kinds (§7): every other crate's error seam is wrapped here
//! rather than propagated as-is.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] tvm_config::ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] tvm_catalog::Error),

    #[error("install error: {0}")]
    Install(#[from] tvm_installer::Error),

    #[error("system detection error: {0}")]
    System(#[from] tvm_system::Error),

    #[error("path error: {0}")]
    Paths(#[from] tvm_paths::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("version {0} is already installed")]
    AlreadyInstalled(String),

    #[error("version {0} is not installed")]
    NotInstalled(String),

    #[error("alias '{0}' already exists")]
    AliasExists(String),

    #[error("alias '{0}' not found")]
    AliasNotFound(String),

    #[error("no system toolchain was detected")]
    NoSystemToolchain,

    #[error("no active version is set")]
    NoActiveVersion,

    #[error("'{0}' is the active version; switch away from it before uninstalling")]
    ActiveVersionInUse(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// A non-fatal diagnostic the front-end may choose to surface or
    /// suppress, distinct from a hard error (§4.F step 6, §7).
    pub fn is_diagnostic(&self) -> bool {
        false
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            path: std::path::PathBuf::new(),
            source,
        }
    }
}

/// A structured, non-fatal diagnostic surfaced alongside a successful
/// operation (§4.F step 6). Not an `Error` variant because it never aborts
/// the operation that produced it.
#[derive(Debug, Clone)]
pub struct PathOrderWarning {
    pub shadowing_dir: std::path::PathBuf,
    pub link_dir: std::path::PathBuf,
    pub remediation: String,
}
