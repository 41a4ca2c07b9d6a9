//! `Manager` (§4.F): orchestrates Components A-E, owns the active-version
//! pointer and the alias store, and implements the switch protocol.

use crate::alias::{AliasStore, OverridePolicy};
use crate::error::{Error, PathOrderWarning, Result};
use crate::pointer;
use chrono::Utc;
use tracing::{info, warn};
use tvm_catalog::CatalogClient;
use tvm_config::Configuration;
use tvm_core::model::{InstalledVersion, SystemToolchain};
use tvm_core::ports::{CancellationToken, EnvironmentProvider, InputPrompter, ProgressSink};
use tvm_core::reserved;
use tvm_core::toolchain;
use tvm_core::version::Version;
use tvm_installer::{Downloader, Installer};
use tvm_paths::{Layout, ProcessLock};
use tvm_system::SystemDetector;

/// A resolved switch/uninstall target, after reserved-name and alias
/// substitution (§4.F step 1).
#[derive(Debug, Clone)]
enum ResolvedTarget {
    System(SystemToolchain),
    Managed(Version),
}

/// Orchestrates configuration, catalog, installer, system detection, the
/// active-version pointer and the alias store behind one process-wide lock.
pub struct Manager {
    layout: Layout,
    detector: SystemDetector,
    catalog: CatalogClient,
    downloader: Downloader,
    installer: Installer,
    aliases: AliasStore,
}

impl Manager {
    pub fn new(cfg: &Configuration) -> Self {
        let layout = Layout::new(&cfg.install_dir);
        let aliases = AliasStore::new(layout.aliases_path());
        Self {
            catalog: CatalogClient::new(cfg.mirror_url.clone()),
            downloader: Downloader::new(),
            installer: Installer::new(),
            detector: SystemDetector::new(),
            aliases,
            layout,
        }
    }

    fn lock(&self) -> Result<ProcessLock> {
        self.layout.ensure_dirs()?;
        Ok(ProcessLock::acquire(&self.layout.lock_path())?)
    }

    /// §4.F `list_installed`: system first if present, then managed
    /// versions newest-first, `is_active` set by cross-referencing the
    /// pointer.
    pub fn list_installed(&self, cfg: &Configuration, env: &dyn EnvironmentProvider) -> Result<Vec<InstalledVersion>> {
        let raw = pointer::read_raw(&self.layout.active_version_pointer_path())?;
        let mut out = Vec::new();

        let system = self.detector.detect(env, &self.layout.versions_dir())?;
        let mut managed = self.managed_versions(cfg)?;
        managed.sort_by(|a, b| b.version.cmp(&a.version));

        let resolves = raw.as_ref().is_some_and(|(v, _)| {
            system.as_ref().is_some_and(|s| &s.version == v) || managed.iter().any(|m| &m.version == v)
        });
        let active_version = match pointer::classify(raw, resolves) {
            pointer::PointerState::Set { version, .. } => Some(version),
            pointer::PointerState::Dangling { version, .. } => {
                warn!("active-version pointer is dangling: {} is not installed", version.canonical());
                None
            }
            pointer::PointerState::Unset => None,
        };

        if let Some(system) = system {
            let is_active = active_version.as_ref() == Some(&system.version);
            out.push(InstalledVersion {
                version: system.version.clone(),
                os: std::env::consts::OS.to_string(),
                arch: std::env::consts::ARCH.to_string(),
                installed_at: Utc::now(),
                is_active,
                is_system: true,
                path: system.executable_path.clone(),
            });
        }

        for mut entry in managed {
            entry.is_active = active_version.as_ref() == Some(&entry.version);
            out.push(entry);
        }

        Ok(out)
    }

    fn managed_versions(&self, cfg: &Configuration) -> Result<Vec<InstalledVersion>> {
        let versions_dir = self.layout.versions_dir();
        if !versions_dir.exists() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for entry in std::fs::read_dir(&versions_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            // Skip in-flight staging directories (`.incoming`, `.deleting`).
            if name.contains('.') {
                continue;
            }
            let Ok(version) = Version::parse(name) else { continue };

            let path = entry.path().join(toolchain::relative_binary_path());
            if !path.is_file() {
                continue;
            }
            let installed_at = entry
                .metadata()
                .and_then(|m| m.created().or_else(|_| m.modified()))
                .map(chrono::DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            out.push(InstalledVersion {
                version,
                os: std::env::consts::OS.to_string(),
                arch: std::env::consts::ARCH.to_string(),
                installed_at,
                is_active: false,
                is_system: false,
                path,
            });
        }
        let _ = cfg;
        Ok(out)
    }

    /// §4.B, delegated to the Catalog Client.
    pub async fn list_available(&self) -> Result<Vec<tvm_core::model::AvailableRelease>> {
        Ok(self.catalog.list_available().await?)
    }

    /// §4.F `install`.
    pub async fn install(
        &self,
        cfg: &Configuration,
        version: &Version,
        os: &str,
        arch: &str,
        progress: &dyn ProgressSink,
        cancel: &dyn CancellationToken,
    ) -> Result<InstalledVersion> {
        let _lock = self.lock()?;

        let target_dir = self.layout.version_dir(version);
        if target_dir.is_dir() && target_dir.join(toolchain::relative_binary_path()).is_file() {
            return Err(Error::AlreadyInstalled(version.canonical()));
        }

        let releases = self.catalog.list_available().await?;
        let release = releases
            .into_iter()
            .find(|r| r.version == *version)
            .ok_or_else(|| Error::InvalidArgument(format!("{} is not an available version", version.canonical())))?;
        let file = Downloader::choose_file(&release, os, arch)?;

        if let Some(checksum_db) = &cfg.checksum_db {
            self.catalog
                .verify_checksum_db(checksum_db, &file.filename, &file.sha256)
                .await?;
        }

        let archive_path = self
            .downloader
            .download(&cfg.mirror_url, file, &cfg.download_dir, progress, cancel)
            .await?;

        let installed = self
            .installer
            .install(&archive_path, version, os, arch, &self.layout.versions_dir())?;

        if cfg.auto_cleanup {
            self.apply_retention(cfg)?;
        }

        self.write_env_script(cfg, &installed)?;

        info!("installed {}", version.canonical());
        Ok(installed)
    }

    /// §4.F step 4: drop the oldest non-active managed versions until the
    /// count is at most `max_versions`. The active version is never a
    /// cleanup candidate.
    fn apply_retention(&self, cfg: &Configuration) -> Result<()> {
        let pointer = pointer::read_raw(&self.layout.active_version_pointer_path())?;
        let active = pointer.map(|(v, _)| v);

        let mut managed = self.managed_versions(cfg)?;
        managed.sort_by(|a, b| a.version.cmp(&b.version));

        let mut total = managed.len();
        let mut candidates: Vec<Version> = managed
            .into_iter()
            .filter(|v| active.as_ref() != Some(&v.version))
            .map(|v| v.version)
            .collect();

        while total > cfg.max_versions as usize && !candidates.is_empty() {
            let oldest = candidates.remove(0);
            warn!("auto_cleanup dropping {}", oldest.canonical());
            self.installer.uninstall(&oldest, &self.layout.versions_dir())?;
            total -= 1;
        }

        Ok(())
    }

    /// §4.F `uninstall`.
    pub fn uninstall(&self, cfg: &Configuration, version: &Version) -> Result<()> {
        let _lock = self.lock()?;

        if let Some((active, _)) = pointer::read_raw(&self.layout.active_version_pointer_path())? {
            if active == *version {
                return Err(Error::ActiveVersionInUse(version.canonical()));
            }
        }

        let target_dir = self.layout.version_dir(version);
        if !target_dir.exists() {
            return Err(Error::NotInstalled(version.canonical()));
        }

        self.installer.uninstall(version, &self.layout.versions_dir())?;
        let _ = std::fs::remove_file(self.layout.per_version_env_path(version));
        let _ = cfg;
        Ok(())
    }

    fn resolve_target(&self, cfg: &Configuration, target: &str, env: &dyn EnvironmentProvider) -> Result<ResolvedTarget> {
        if reserved::is_system_sentinel(target) {
            let system = self
                .detector
                .detect(env, &self.layout.versions_dir())?
                .ok_or(Error::NoSystemToolchain)?;
            return Ok(ResolvedTarget::System(system));
        }

        if let Ok(version) = self.aliases.resolve(target) {
            return Ok(ResolvedTarget::Managed(version));
        }

        let version = Version::parse(target)
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;
        let _ = cfg;
        Ok(ResolvedTarget::Managed(version))
    }

    /// §4.F `use` — THE SWITCH PROTOCOL.
    pub fn use_version(
        &self,
        cfg: &Configuration,
        target: &str,
        env: &dyn EnvironmentProvider,
    ) -> Result<(InstalledVersion, Option<PathOrderWarning>)> {
        let _lock = self.lock()?;

        let resolved = self.resolve_target(cfg, target, env)?;

        let (version, binary_path, is_system) = match &resolved {
            ResolvedTarget::System(system) => {
                if !system.is_valid {
                    return Err(Error::NoSystemToolchain);
                }
                (system.version.clone(), system.executable_path.clone(), true)
            }
            ResolvedTarget::Managed(version) => {
                let dir = self.layout.version_dir(version);
                let binary = dir.join(toolchain::relative_binary_path());
                if !binary.is_file() {
                    return Err(Error::NotInstalled(version.canonical()));
                }
                (version.clone(), binary, false)
            }
        };

        let pointer_path = self.layout.active_version_pointer_path();
        let previous = pointer::read_raw(&pointer_path)?;
        let now = Utc::now();

        pointer::write(&pointer_path, &version, now)?;

        let link_dir = tvm_paths::layout::link_dir(env.home_dir().as_deref())?;
        let link_name = tvm_paths::layout::link_file_name(toolchain::binary_file_name());

        let link_result = tvm_paths::link::update_link(
            &link_dir,
            &link_name,
            &binary_path,
            &pointer_path,
            &self.layout.versions_dir(),
        );

        if let Err(link_err) = link_result {
            // Step 8: revert the pointer so a concurrent reader never
            // observes a pointer/link mismatch.
            match previous {
                Some((prev_version, prev_at)) => {
                    let _ = pointer::write(&pointer_path, &prev_version, prev_at);
                }
                None => {
                    let _ = std::fs::remove_file(&pointer_path);
                }
            }
            return Err(link_err.into());
        }

        let warning = if cfg!(windows) {
            self.check_path_order(env, &link_dir, &link_name)
        } else {
            None
        };

        let installed = InstalledVersion {
            version: version.clone(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            installed_at: now,
            is_active: true,
            is_system,
            path: binary_path,
        };

        self.write_env_script(cfg, &installed)?;

        info!("switched to {}", version.canonical());
        Ok((installed, warning))
    }

    /// §4.F step 6 (Windows only): if a directory earlier in `PATH`
    /// contains a same-named binary that shadows `link_dir`, surface a
    /// `PathOrderWarning` rather than failing the switch.
    fn check_path_order(
        &self,
        env: &dyn EnvironmentProvider,
        link_dir: &std::path::Path,
        link_name: &str,
    ) -> Option<PathOrderWarning> {
        let path_var = env.var("PATH")?;
        for dir in std::env::split_paths(&path_var) {
            if dir.as_path() == link_dir {
                return None;
            }
            if dir.join(link_name).is_file() {
                return Some(PathOrderWarning {
                    shadowing_dir: dir.clone(),
                    link_dir: link_dir.to_path_buf(),
                    remediation: format!(
                        "move {} before {} in PATH, or remove the shadowing binary",
                        link_dir.display(),
                        dir.display()
                    ),
                });
            }
        }
        None
    }

    /// §4.F `current`.
    pub fn current(&self, cfg: &Configuration, env: &dyn EnvironmentProvider) -> Result<InstalledVersion> {
        let raw = pointer::read_raw(&self.layout.active_version_pointer_path())?;
        let Some((version, activated_at)) = raw else {
            return Err(Error::NoActiveVersion);
        };

        if let Some(system) = self.detector.detect(env, &self.layout.versions_dir())? {
            if system.version == version {
                return Ok(InstalledVersion {
                    version,
                    os: std::env::consts::OS.to_string(),
                    arch: std::env::consts::ARCH.to_string(),
                    installed_at: activated_at,
                    is_active: true,
                    is_system: true,
                    path: system.executable_path,
                });
            }
        }

        let dir = self.layout.version_dir(&version);
        let binary = dir.join(toolchain::relative_binary_path());
        if !binary.is_file() {
            if let pointer::PointerState::Dangling { version, .. } =
                pointer::classify(Some((version, activated_at)), false)
            {
                warn!("active-version pointer is dangling: {} is not installed", version.canonical());
            }
            return Err(Error::NoActiveVersion);
        }

        let _ = cfg;
        Ok(InstalledVersion {
            version,
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            installed_at: activated_at,
            is_active: true,
            is_system: false,
            path: binary,
        })
    }

    /// §4.E, delegated to the System Detector.
    pub fn system_info(&self, env: &dyn EnvironmentProvider) -> Result<Option<SystemToolchain>> {
        Ok(self.detector.detect(env, &self.layout.versions_dir())?)
    }

    fn write_env_script(&self, cfg: &Configuration, installed: &InstalledVersion) -> Result<()> {
        let home_dir = tvm_core::ports::ProcessEnvironmentProvider.home_dir();
        let env = tvm_env::environment_for(cfg, installed, home_dir.as_deref());
        let script = tvm_env::render_posix_script(&env);

        let path = self.layout.per_version_env_path(&installed.version);
        self.layout.ensure_dirs()?;
        std::fs::write(&path, script)?;
        Ok(())
    }

    // -- alias passthrough -------------------------------------------------

    pub fn create_alias(
        &self,
        name: &str,
        version: &Version,
        policy: OverridePolicy,
        prompter: &dyn InputPrompter,
    ) -> Result<()> {
        let _lock = self.lock()?;
        self.aliases.create(name, version, policy, prompter)
    }

    pub fn remove_alias(&self, name: &str) -> Result<()> {
        let _lock = self.lock()?;
        self.aliases.remove(name)
    }

    pub fn list_aliases(&self) -> Result<Vec<tvm_core::model::Alias>> {
        self.aliases.list()
    }

    pub fn resolve_alias(&self, name: &str) -> Result<Version> {
        self.aliases.resolve(name)
    }

    pub fn aliases_for(&self, version: &Version) -> Result<Vec<tvm_core::model::Alias>> {
        self.aliases.by_version(version)
    }

    pub fn suggest_aliases(&self, version: &Version) -> Vec<String> {
        crate::alias::suggest(version)
    }

    pub fn export_aliases(&self, dest: &std::path::Path) -> Result<()> {
        self.aliases.export(dest)
    }

    pub fn import_aliases(&self, src: &std::path::Path, policy: OverridePolicy, prompter: &dyn InputPrompter) -> Result<()> {
        let _lock = self.lock()?;
        self.aliases.import(src, policy, prompter)
    }
}
