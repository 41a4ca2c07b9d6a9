//! Component E — System Detector (§4.E).

use crate::candidates::fixed_candidates;
use crate::classify::classify_origin;
use crate::error::Result;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;
use tvm_core::model::SystemToolchain;
use tvm_core::ports::EnvironmentProvider;
use tvm_core::toolchain;
use tvm_core::version::Version;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    path_var: String,
    user: String,
    platform: &'static str,
}

impl CacheKey {
    fn current(env: &dyn EnvironmentProvider) -> Self {
        Self {
            path_var: env.var("PATH").unwrap_or_default(),
            user: env
                .var("USER")
                .or_else(|| env.var("USERNAME"))
                .unwrap_or_default(),
            platform: std::env::consts::OS,
        }
    }
}

/// Finds and classifies a pre-existing system toolchain. Determinism: once
/// a result is computed for this process it is never recomputed, even if
/// the caller's cache key inputs (`PATH`, user, platform) later change —
/// `SystemDetector` is meant to be constructed once per command invocation.
#[derive(Default)]
pub struct SystemDetector {
    cache: OnceCell<(CacheKey, Option<SystemToolchain>)>,
}

impl SystemDetector {
    pub fn new() -> Self {
        Self {
            cache: OnceCell::new(),
        }
    }

    /// Run detection (or return the cached result). `managed_versions_root`
    /// is used to skip candidates that resolve into the manager's own
    /// versions directory (a managed install, not a system one).
    pub fn detect(
        &self,
        env: &dyn EnvironmentProvider,
        managed_versions_root: &Path,
    ) -> Result<Option<SystemToolchain>> {
        let key = CacheKey::current(env);
        let (cached_key, result) = self
            .cache
            .get_or_try_init(|| -> Result<(CacheKey, Option<SystemToolchain>)> {
                let found = detect_uncached(env, managed_versions_root)?;
                Ok((key.clone(), found))
            })?;

        if *cached_key != key {
            debug!("system detector cache key changed mid-process; returning stale result");
        }
        Ok(result.clone())
    }
}

fn detect_uncached(
    env: &dyn EnvironmentProvider,
    managed_versions_root: &Path,
) -> Result<Option<SystemToolchain>> {
    let mut candidates: Vec<PathBuf> = fixed_candidates().into_iter().map(PathBuf::from).collect();

    if let Ok(path_lookup) = which::which(toolchain::BIN_NAME) {
        candidates.push(path_lookup);
    }

    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }

        let resolved = std::fs::canonicalize(&candidate).unwrap_or_else(|_| candidate.clone());
        if resolved.starts_with(managed_versions_root) {
            debug!("skipping managed install at {}", resolved.display());
            continue;
        }

        let Some(toolchain) = probe_candidate(&resolved, env) else {
            continue;
        };
        return Ok(Some(toolchain));
    }

    Ok(None)
}

fn probe_candidate(executable_path: &Path, env: &dyn EnvironmentProvider) -> Option<SystemToolchain> {
    let output = std::process::Command::new(executable_path)
        .arg(toolchain::VERSION_FLAG)
        .output()
        .ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let token = toolchain::extract_version_token(&stdout)?;
    let version = Version::parse(&token).ok()?;

    let runtime_root = executable_path
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| executable_path.to_path_buf());

    let workspace_root = env
        .home_dir()
        .map(|h| h.join("toolchain-workspace"))
        .unwrap_or_else(|| PathBuf::from("toolchain-workspace"));

    Some(SystemToolchain {
        executable_path: executable_path.to_path_buf(),
        version,
        runtime_root,
        workspace_root,
        origin: classify_origin(executable_path),
        is_valid: true,
    })
}
