//! Component A — Configuration (§4.A).
//!
//! Loads, validates and persists settings; supplies authoritative values
//! (roots, mirror URL, policies) to every other component. Deliberately a
//! thin `serde_json` + write-temp-then-rename layer rather than a layered
//! profile engine: see `DESIGN.md` for why this crate does not reach for
//! the teacher's `figment`.

mod error;

pub use error::{ConfigError, Result};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Strategy for resolving the `GOPATH`-equivalent workspace root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkspaceMode {
    Shared,
    VersionSpecific,
    Custom,
}

impl Default for WorkspaceMode {
    fn default() -> Self {
        WorkspaceMode::Shared
    }
}

/// The enumerated configuration surface (§4.A `recognized_options`).
///
/// | option | effect |
/// |---|---|
/// | `install_dir` | root of `versions/` |
/// | `download_dir` | scratch archive cache |
/// | `mirror_url` | catalog + artifact base URL |
/// | `auto_cleanup` | enables max-versions retention after install |
/// | `max_versions` | retention cap |
/// | `workspace_mode` | env computation strategy (`GOPATH`-equivalent) |
/// | `custom_workspace` | literal value when `workspace_mode = custom` |
/// | `proxy_url` | module proxy for activation env |
/// | `checksum_db` | checksum DB URL for activation env |
/// | `set_environment` | whether the manager writes per-version env scripts |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub install_dir: PathBuf,
    pub download_dir: PathBuf,
    pub mirror_url: String,
    #[serde(default)]
    pub auto_cleanup: bool,
    #[serde(default = "default_max_versions")]
    pub max_versions: u32,
    #[serde(default)]
    pub workspace_mode: WorkspaceMode,
    #[serde(default)]
    pub custom_workspace: Option<String>,
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub checksum_db: Option<String>,
    #[serde(default = "default_true")]
    pub set_environment: bool,
}

fn default_max_versions() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for Configuration {
    fn default() -> Self {
        let root = default_root_dir();
        Self {
            install_dir: root.clone(),
            download_dir: root.join("downloads"),
            mirror_url: "https://dl.example-toolchain.org/dl".to_string(),
            auto_cleanup: false,
            max_versions: default_max_versions(),
            workspace_mode: WorkspaceMode::Shared,
            custom_workspace: None,
            proxy_url: None,
            checksum_db: None,
            set_environment: true,
        }
    }
}

fn default_root_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tvm")
}

/// Load configuration from `path`. A missing file is **not** an error: the
/// defaults are returned and the file is not written implicitly.
pub fn load(path: &Path) -> Result<Configuration> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str::<Configuration>(&contents)
            .map_err(|source| ConfigError::Decode {
                path: path.to_path_buf(),
                source,
            })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Configuration::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    validate(&cfg)?;
    Ok(cfg)
}

/// Persist `cfg` to `path` via write-temp-then-rename: a concurrent reader
/// always observes either the previous content or the new content, never a
/// partial write.
pub fn save(path: &Path, cfg: &Configuration) -> Result<()> {
    validate(cfg)?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let body = serde_json::to_string_pretty(cfg).map_err(|source| ConfigError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    std::io::Write::write_all(&mut tmp, body.as_bytes()).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.persist(path)
        .map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

/// Validate `cfg`, rejecting: empty paths, non-absolute `install_dir`/
/// `download_dir`, `max_versions < 1`, `workspace_mode = custom` with an
/// empty `custom_workspace`, and non-`http(s)://` URLs.
pub fn validate(cfg: &Configuration) -> Result<()> {
    if cfg.install_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("install_dir must not be empty".into()));
    }
    if !cfg.install_dir.is_absolute() {
        return Err(ConfigError::Validation("install_dir must be an absolute path".into()));
    }
    if cfg.download_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("download_dir must not be empty".into()));
    }
    if !cfg.download_dir.is_absolute() {
        return Err(ConfigError::Validation("download_dir must be an absolute path".into()));
    }
    if cfg.max_versions < 1 {
        return Err(ConfigError::Validation("max_versions must be >= 1".into()));
    }
    if cfg.workspace_mode == WorkspaceMode::Custom
        && cfg.custom_workspace.as_deref().unwrap_or("").is_empty()
    {
        return Err(ConfigError::Validation(
            "custom_workspace is required when workspace_mode = custom".into(),
        ));
    }
    validate_url(&cfg.mirror_url, "mirror_url")?;
    if let Some(proxy) = &cfg.proxy_url {
        validate_url(proxy, "proxy_url")?;
    }
    if let Some(db) = &cfg.checksum_db {
        validate_url(db, "checksum_db")?;
    }
    Ok(())
}

fn validate_url(url: &str, field: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Validation(format!(
            "{field} must be an http(s):// URL, got '{url}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn valid_config(root: &Path) -> Configuration {
        Configuration {
            install_dir: root.join("versions"),
            download_dir: root.join("downloads"),
            ..Configuration::default()
        }
    }

    #[test]
    fn missing_file_returns_defaults_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = load(&path).unwrap();
        assert_eq!(cfg, Configuration::default());
        assert!(!path.exists());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = valid_config(dir.path());
        save(&path, &cfg).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn rejects_relative_install_dir() {
        let mut cfg = Configuration::default();
        cfg.install_dir = PathBuf::from("relative/versions");
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn rejects_zero_max_versions() {
        let mut cfg = Configuration::default();
        cfg.max_versions = 0;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn rejects_custom_mode_without_custom_workspace() {
        let mut cfg = Configuration::default();
        cfg.workspace_mode = WorkspaceMode::Custom;
        cfg.custom_workspace = None;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn rejects_non_http_mirror() {
        let mut cfg = Configuration::default();
        cfg.mirror_url = "ftp://example.com".to_string();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn corrupt_json_is_a_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Decode { .. })));
    }
}
