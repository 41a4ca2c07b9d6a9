//! On-disk layout constants (§3).
//!
//! ```text
//! <root>/
//!   config.json
//!   versions/<canonical>/…
//!   downloads/
//!   state/active-version
//!   state/aliases.json
//!   state/.lock
//!   scripts/toolchain-init.<ext>
//!   scripts/<canonical>.env
//! <link_dir>/<binary_name>
//! ```

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tvm_core::version::Version;

/// Resolved paths rooted at a single `install_dir` (Configuration's root).
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn version_dir(&self, version: &Version) -> PathBuf {
        self.versions_dir().join(version.canonical())
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.root.join("downloads")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join("state")
    }

    pub fn active_version_pointer_path(&self) -> PathBuf {
        self.state_dir().join("active-version")
    }

    pub fn aliases_path(&self) -> PathBuf {
        self.state_dir().join("aliases.json")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir().join(".lock")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("scripts")
    }

    pub fn toolchain_init_script_path(&self) -> PathBuf {
        let ext = if cfg!(windows) { "ps1" } else { "sh" };
        self.scripts_dir().join(format!("toolchain-init.{ext}"))
    }

    pub fn per_version_env_path(&self, version: &Version) -> PathBuf {
        self.scripts_dir().join(format!("{}.env", version.canonical()))
    }

    /// Create every directory this layout owns (idempotent).
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [
            self.root.clone(),
            self.versions_dir(),
            self.downloads_dir(),
            self.state_dir(),
            self.scripts_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|source| Error::Io { path: dir, source })?;
        }
        Ok(())
    }
}

/// Platform-specific directory the active-binary link/shim lives in.
pub fn link_dir(home: Option<&Path>) -> Result<PathBuf> {
    if cfg!(windows) {
        std::env::var_os("LOCALAPPDATA")
            .map(|v| PathBuf::from(v).join("bin"))
            .ok_or(Error::NoHomeDir)
    } else {
        home.map(|h| h.join(".local").join("bin")).ok_or(Error::NoHomeDir)
    }
}

/// Name of the link/shim file inside `link_dir()`, with the platform's
/// executable extension.
pub fn link_file_name(binary_name: &str) -> String {
    if cfg!(windows) {
        format!("{binary_name}.exe")
    } else {
        binary_name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths_are_rooted_consistently() {
        let layout = Layout::new("/opt/tvm");
        assert_eq!(layout.config_path(), PathBuf::from("/opt/tvm/config.json"));
        assert_eq!(layout.versions_dir(), PathBuf::from("/opt/tvm/versions"));
        assert_eq!(
            layout.active_version_pointer_path(),
            PathBuf::from("/opt/tvm/state/active-version")
        );
        assert_eq!(layout.lock_path(), PathBuf::from("/opt/tvm/state/.lock"));
    }

    #[test]
    fn version_dir_uses_canonical_form() {
        let layout = Layout::new("/opt/tvm");
        let version = Version::parse("1.21.0").unwrap();
        assert_eq!(
            layout.version_dir(&version),
            PathBuf::from("/opt/tvm/versions/v1.21.0")
        );
    }
}
