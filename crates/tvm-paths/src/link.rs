//! Link-directory indirection (§4.F step 5, §9 open question on Windows
//! fallback). The active binary is always reached through one path,
//! `<link_dir>/<binary_name>[.ext]`; switching rewrites what that path
//! resolves to without ever leaving it momentarily missing.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Which mechanism was used to point the link-directory entry at the
/// active binary. Exposed so callers (and tests) can observe which path
/// through the Windows fallback chain was taken, per §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStrategy {
    SymLink,
    HardLink,
    LauncherShim,
}

/// Point `link_dir/link_name` at `target_binary`, using the indirection
/// protocol from §4.F step 5. `pointer_path` and `versions_dir` are only
/// consulted by the Windows launcher-shim fallback, which re-reads the
/// active-version pointer on every invocation rather than baking in
/// `target_binary`. Returns the strategy that succeeded.
pub fn update_link(
    link_dir: &Path,
    link_name: &str,
    target_binary: &Path,
    pointer_path: &Path,
    versions_dir: &Path,
) -> Result<LinkStrategy> {
    std::fs::create_dir_all(link_dir).map_err(|source| Error::Io {
        path: link_dir.to_path_buf(),
        source,
    })?;

    let final_path = link_dir.join(link_name);

    if cfg!(windows) {
        update_link_windows(link_dir, &final_path, target_binary, pointer_path, versions_dir)
    } else {
        update_link_unix(link_dir, &final_path, target_binary)
    }
}

fn update_link_unix(link_dir: &Path, final_path: &Path, target_binary: &Path) -> Result<LinkStrategy> {
    let staged = link_dir.join(format!("{}.new", file_name(final_path)));
    let _ = std::fs::remove_file(&staged);

    #[cfg(unix)]
    std::os::unix::fs::symlink(target_binary, &staged).map_err(|source| Error::Io {
        path: staged.clone(),
        source,
    })?;
    #[cfg(not(unix))]
    let _ = target_binary;

    std::fs::rename(&staged, final_path).map_err(|source| Error::Io {
        path: final_path.to_path_buf(),
        source,
    })?;
    debug!("switched {} to {}", final_path.display(), target_binary.display());
    Ok(LinkStrategy::SymLink)
}

#[cfg(windows)]
fn update_link_windows(
    link_dir: &Path,
    final_path: &Path,
    target_binary: &Path,
    pointer_path: &Path,
    versions_dir: &Path,
) -> Result<LinkStrategy> {
    let staged = link_dir.join(format!("{}.new", file_name(final_path)));
    let _ = std::fs::remove_file(&staged);

    if std::os::windows::fs::symlink_file(target_binary, &staged).is_ok() {
        return finish_rename(&staged, final_path, LinkStrategy::SymLink);
    }
    warn!("symlink creation failed (likely missing privilege), falling back to hard link");

    let _ = std::fs::remove_file(&staged);
    if std::fs::hard_link(target_binary, &staged).is_ok() {
        return finish_rename(&staged, final_path, LinkStrategy::HardLink);
    }
    warn!("hard link creation failed (likely cross-volume), falling back to launcher shim");

    write_launcher_shim(&staged, pointer_path, versions_dir)?;
    finish_rename(&staged, final_path, LinkStrategy::LauncherShim)
}

#[cfg(not(windows))]
fn update_link_windows(
    _link_dir: &Path,
    _final_path: &Path,
    _target_binary: &Path,
    _pointer_path: &Path,
    _versions_dir: &Path,
) -> Result<LinkStrategy> {
    unreachable!("update_link dispatches here only when cfg!(windows)")
}

#[cfg(windows)]
fn finish_rename(staged: &Path, final_path: &Path, strategy: LinkStrategy) -> Result<LinkStrategy> {
    std::fs::rename(staged, final_path).map_err(|source| Error::Io {
        path: final_path.to_path_buf(),
        source,
    })?;
    Ok(strategy)
}

/// A small batch-script launcher, picked up by `cmd.exe`'s `PATHEXT`
/// resolution for the bare `link_name` even without a `.exe` suffix. Per
/// §4.F step 5 it re-reads the ActiveVersionPointer at invocation time and
/// resolves the binary from it, rather than baking in a fixed target, so a
/// later switch takes effect without rewriting the shim.
///
/// Known gap: the pointer records only a canonical version, not whether it
/// resolved to a managed install or the system toolchain (§3, §4.F); this
/// shim only resolves managed installs under `versions_dir`. Switching to
/// `system` while running on this fallback (no symlink privilege and no
/// same-volume hard link available) is not handled — see DESIGN.md.
#[cfg(windows)]
fn write_launcher_shim(path: &Path, pointer_path: &Path, versions_dir: &Path) -> Result<()> {
    let relative_binary = tvm_core::toolchain::relative_binary_path().replace('/', "\\");
    let script = format!(
        "@echo off\r\n\
         setlocal enabledelayedexpansion\r\n\
         set \"POINTER={pointer}\"\r\n\
         set \"VERSIONS={versions}\"\r\n\
         if not exist \"%POINTER%\" (\r\n\
         \techo tvm: no active version set 1>&2\r\n\
         \texit /b 1\r\n\
         )\r\n\
         set \"ACTIVE=\"\r\n\
         for /f \"usebackq tokens=1,* delims==\" %%K in (\"%POINTER%\") do (\r\n\
         \tif \"%%K\"==\"active_version\" set \"ACTIVE=%%L\"\r\n\
         )\r\n\
         if not defined ACTIVE (\r\n\
         \techo tvm: no active version set 1>&2\r\n\
         \texit /b 1\r\n\
         )\r\n\
         set \"TARGET=%VERSIONS%\\%ACTIVE%\\{relative_binary}\"\r\n\
         if not exist \"%TARGET%\" (\r\n\
         \techo tvm: active version %ACTIVE% is not installed under %VERSIONS% 1>&2\r\n\
         \texit /b 1\r\n\
         )\r\n\
         \"%TARGET%\" %*\r\n\
         exit /b %errorlevel%\r\n",
        pointer = pointer_path.display(),
        versions = versions_dir.display(),
        relative_binary = relative_binary,
    );
    std::fs::write(path, script).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    #[test]
    fn update_link_unix_points_at_target() {
        let tmp = tempfile::tempdir().unwrap();
        let bin_dir = tmp.path().join("bin1");
        std::fs::create_dir_all(&bin_dir).unwrap();
        let target = bin_dir.join("go");
        std::fs::write(&target, b"binary").unwrap();

        let link_dir = tmp.path().join("link");
        let pointer_path = tmp.path().join("state").join("active-version");
        let versions_dir = tmp.path().join("versions");
        let strategy = update_link(&link_dir, "go", &target, &pointer_path, &versions_dir).unwrap();
        assert_eq!(strategy, LinkStrategy::SymLink);

        let resolved = std::fs::read_link(link_dir.join("go")).unwrap();
        assert_eq!(resolved, target);
    }

    #[test]
    fn update_link_unix_can_be_repointed() {
        let tmp = tempfile::tempdir().unwrap();
        let bin_a = tmp.path().join("a");
        let bin_b = tmp.path().join("b");
        std::fs::write(&bin_a, b"a").unwrap();
        std::fs::write(&bin_b, b"b").unwrap();

        let link_dir = tmp.path().join("link");
        let pointer_path = tmp.path().join("state").join("active-version");
        let versions_dir = tmp.path().join("versions");
        update_link(&link_dir, "go", &bin_a, &pointer_path, &versions_dir).unwrap();
        update_link(&link_dir, "go", &bin_b, &pointer_path, &versions_dir).unwrap();

        let resolved = std::fs::read_link(link_dir.join("go")).unwrap();
        assert_eq!(resolved, bin_b);
    }
}
