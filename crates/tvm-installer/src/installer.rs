//! Component D — Installer (§4.D).

use crate::error::{Error, Result};
use backon::{BlockingRetryable, ExponentialBuilder};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use tvm_core::model::InstalledVersion;
use tvm_core::toolchain;
use tvm_core::version::Version;

#[derive(Debug, Serialize, Deserialize)]
struct InstallMetadata {
    version: String,
    os: String,
    arch: String,
    installed_at: chrono::DateTime<Utc>,
}

/// Extracts a verified archive into the versions root and records it.
pub struct Installer;

impl Default for Installer {
    fn default() -> Self {
        Self::new()
    }
}

impl Installer {
    pub fn new() -> Self {
        Self
    }

    /// Turn `archive_path` into `versions_root/<version>` (§4.D protocol).
    pub fn install(
        &self,
        archive_path: &Path,
        version: &Version,
        os: &str,
        arch: &str,
        versions_root: &Path,
    ) -> Result<InstalledVersion> {
        let final_dir = versions_root.join(version.canonical());
        let incoming_dir = versions_root.join(format!("{}.incoming", version.canonical()));

        if final_dir.exists() {
            if is_empty_dir(&final_dir)? {
                std::fs::remove_dir(&final_dir).map_err(|source| Error::Io {
                    path: final_dir.clone(),
                    source,
                })?;
            } else {
                return Err(Error::AlreadyInstalled {
                    version: version.canonical(),
                    path: final_dir,
                });
            }
        }

        let result = self.try_install(archive_path, version, os, arch, &incoming_dir);

        if result.is_err() {
            let _ = std::fs::remove_dir_all(&incoming_dir);
        }
        result?;

        std::fs::rename(&incoming_dir, &final_dir).map_err(|source| Error::Io {
            path: final_dir.clone(),
            source,
        })?;

        let path = final_dir.join(toolchain::relative_binary_path());
        Ok(InstalledVersion {
            version: version.clone(),
            os: os.to_string(),
            arch: arch.to_string(),
            installed_at: Utc::now(),
            is_active: false,
            is_system: false,
            path,
        })
    }

    fn try_install(
        &self,
        archive_path: &Path,
        version: &Version,
        os: &str,
        arch: &str,
        incoming_dir: &Path,
    ) -> Result<()> {
        std::fs::create_dir_all(incoming_dir).map_err(|source| Error::Io {
            path: incoming_dir.to_path_buf(),
            source,
        })?;

        extract_archive(archive_path, incoming_dir)?;
        strip_wrapper_dir(incoming_dir)?;

        let binary = incoming_dir.join(toolchain::relative_binary_path());
        if !binary.is_file() {
            return Err(Error::CorruptInstall {
                version: version.canonical(),
                reason: format!("entry-point binary missing at {}", binary.display()),
            });
        }
        ensure_executable(&binary)?;

        let reported = run_version_query(&binary, version)?;
        if !version.numerically_matches(&reported) {
            return Err(Error::CorruptInstall {
                version: version.canonical(),
                reason: format!(
                    "extracted binary reports version {reported} but {} was requested",
                    version.canonical()
                ),
            });
        }

        let metadata = InstallMetadata {
            version: version.canonical(),
            os: os.to_string(),
            arch: arch.to_string(),
            installed_at: Utc::now(),
        };
        let metadata_path = incoming_dir.join(".metadata.json");
        let json = serde_json::to_vec_pretty(&metadata).map_err(|source| Error::CorruptInstall {
            version: version.canonical(),
            reason: format!("failed to serialize install metadata: {source}"),
        })?;
        std::fs::write(&metadata_path, json).map_err(|source| Error::Io {
            path: metadata_path,
            source,
        })?;

        Ok(())
    }

    /// §4.D uninstall protocol: rename-then-remove with bounded retry for
    /// platforms (Windows) that may briefly hold an open handle.
    pub fn uninstall(&self, version: &Version, versions_root: &Path) -> Result<()> {
        let target_dir = versions_root.join(version.canonical());
        let deleting_dir = versions_root.join(format!("{}.deleting", version.canonical()));

        if !target_dir.exists() {
            return Ok(());
        }

        let strategy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(5))
            .with_factor(1.5)
            .with_max_times(5);

        let mut attempts = 0u32;
        let rename_result = (|| {
            attempts += 1;
            std::fs::rename(&target_dir, &deleting_dir)
        })
        .retry(strategy)
        .notify(|err: &std::io::Error, dur: Duration| {
            warn!("rename during uninstall failed: {err}, retrying in {dur:?}");
        })
        .call();

        if let Err(source) = rename_result {
            return Err(Error::UninstallFailed {
                version: version.canonical(),
                attempts,
                reason: source.to_string(),
            });
        }

        std::fs::remove_dir_all(&deleting_dir).map_err(|source| Error::UninstallFailed {
            version: version.canonical(),
            attempts,
            reason: source.to_string(),
        })
    }
}

fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries = std::fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(entries.next().is_none())
}

fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let filename = archive_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    if filename.ends_with(".tar.gz") || filename.ends_with(".tgz") {
        let file = std::fs::File::open(archive_path).map_err(|source| Error::Io {
            path: archive_path.to_path_buf(),
            source,
        })?;
        let decoder = flate2::read::GzDecoder::new(file);
        let mut archive = tar::Archive::new(decoder);
        archive.set_preserve_permissions(true);
        archive.unpack(dest).map_err(|source| Error::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(())
    } else if filename.ends_with(".zip") {
        let file = std::fs::File::open(archive_path).map_err(|source| Error::Io {
            path: archive_path.to_path_buf(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|source| Error::CorruptInstall {
            version: String::new(),
            reason: format!("failed to open zip archive: {source}"),
        })?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|source| Error::CorruptInstall {
                version: String::new(),
                reason: format!("failed to read zip entry {i}: {source}"),
            })?;
            let Some(relative) = entry.enclosed_name() else {
                continue;
            };
            let entry_path = dest.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&entry_path).map_err(|source| Error::Io {
                    path: entry_path.clone(),
                    source,
                })?;
                continue;
            }

            if let Some(parent) = entry_path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            let mut out = std::fs::File::create(&entry_path).map_err(|source| Error::Io {
                path: entry_path.clone(),
                source,
            })?;
            std::io::copy(&mut entry, &mut out).map_err(|source| Error::Io {
                path: entry_path.clone(),
                source,
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if entry.unix_mode().unwrap_or(0) & 0o111 != 0 {
                    let mut perms = std::fs::metadata(&entry_path)
                        .map_err(|source| Error::Io {
                            path: entry_path.clone(),
                            source,
                        })?
                        .permissions();
                    perms.set_mode(perms.mode() | 0o755);
                    std::fs::set_permissions(&entry_path, perms).map_err(|source| Error::Io {
                        path: entry_path.clone(),
                        source,
                    })?;
                }
            }
        }
        Ok(())
    } else {
        Err(Error::UnsupportedFormat {
            filename: filename.to_string(),
        })
    }
}

/// Tarballs commonly nest everything under one top-level directory (e.g.
/// `go/bin/go`); if `dest` contains exactly one entry and that entry is a
/// directory, hoist its contents up a level.
fn strip_wrapper_dir(dest: &Path) -> Result<()> {
    let entries: Vec<PathBuf> = std::fs::read_dir(dest)
        .map_err(|source| Error::Io {
            path: dest.to_path_buf(),
            source,
        })?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();

    if entries.len() != 1 || !entries[0].is_dir() {
        return Ok(());
    }

    let wrapper = &entries[0];
    debug!("stripping wrapper directory {}", wrapper.display());

    for entry in walkdir::WalkDir::new(wrapper)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let target = dest.join(entry.file_name());
        std::fs::rename(entry.path(), &target).map_err(|source| Error::Io {
            path: target,
            source,
        })?;
    }

    std::fs::remove_dir(wrapper).map_err(|source| Error::Io {
        path: wrapper.clone(),
        source,
    })?;
    Ok(())
}

#[cfg(unix)]
fn ensure_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = std::fs::metadata(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut perms = metadata.permissions();
    if perms.mode() & 0o111 == 0 {
        perms.set_mode(perms.mode() | 0o755);
        std::fs::set_permissions(path, perms).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn run_version_query(binary: &Path, version: &Version) -> Result<String> {
    let output = std::process::Command::new(binary)
        .arg(toolchain::VERSION_FLAG)
        .output()
        .map_err(|source| Error::Io {
            path: binary.to_path_buf(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    toolchain::extract_version_token(&stdout).ok_or_else(|| Error::CorruptInstall {
        version: version.canonical(),
        reason: format!("could not parse version from entry-point output: {stdout:?}"),
    })
}
