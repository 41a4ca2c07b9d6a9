//! Data types shared across the core: installed versions, catalog
//! projections, the detected system toolchain and aliases.

use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One managed or system toolchain entry, as surfaced by `list_installed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledVersion {
    pub version: Version,
    pub os: String,
    pub arch: String,
    pub installed_at: DateTime<Utc>,
    pub is_active: bool,
    pub is_system: bool,
    /// Absolute path to the toolchain's entry-point binary.
    pub path: PathBuf,
}

/// The kind of artifact a catalog file represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Archive,
    Installer,
    Source,
}

/// One file entry in a catalog release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseFile {
    pub filename: String,
    pub os: String,
    pub arch: String,
    pub sha256: String,
    pub size: u64,
    pub kind: ArtifactKind,
}

/// A release as projected from the mirror catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableRelease {
    pub version: Version,
    pub stable: bool,
    pub files: Vec<ReleaseFile>,
}

impl AvailableRelease {
    /// Find the file matching `os`/`arch` whose kind is `Archive`, preferring
    /// the platform's native archive kind (caller picks by filename suffix).
    pub fn file_for(&self, os: &str, arch: &str) -> Option<&ReleaseFile> {
        self.files
            .iter()
            .find(|f| f.os == os && f.arch == arch && f.kind == ArtifactKind::Archive)
    }
}

/// Where a detected system toolchain appears to have come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemOrigin {
    PackageManager,
    Homebrew,
    Manual,
    Unknown,
}

/// A system-installed toolchain discovered outside the manager's control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemToolchain {
    pub executable_path: PathBuf,
    pub version: Version,
    /// `GOROOT`-equivalent: the toolchain's own install root.
    pub runtime_root: PathBuf,
    /// `GOPATH`-equivalent: the user workspace root the toolchain defaults to.
    pub workspace_root: PathBuf,
    pub origin: SystemOrigin,
    pub is_valid: bool,
}

/// A user-defined short name pointing at a canonical version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub version: Version,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
