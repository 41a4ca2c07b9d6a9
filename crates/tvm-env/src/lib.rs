//! `environment_for` (§4.F) and per-version env script rendering (§6).

use std::path::{Path, PathBuf};
use tvm_config::{Configuration, WorkspaceMode};
use tvm_core::model::InstalledVersion;

/// One entry of the environment mapping, in the enumerated order §4.F
/// specifies: runtime root, workspace root, proxy, checksum DB, PATH
/// prepend. Order is preserved (not a `HashMap`) so the rendered script is
/// byte-stable across runs with the same inputs.
pub type EnvironmentMap = Vec<(String, String)>;

/// Pure function over `Configuration` and an `InstalledVersion`: no I/O, no
/// clock, no environment reads. `home_dir` stands in for the platform home
/// directory the `shared` workspace mode resolves against.
pub fn environment_for(
    cfg: &Configuration,
    installed: &InstalledVersion,
    home_dir: Option<&Path>,
) -> EnvironmentMap {
    let runtime_root = installed
        .path
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| installed.path.clone());

    let workspace_root = workspace_root_for(cfg, &installed.version.canonical(), home_dir);

    let mut env = vec![
        ("RUNTIME_ROOT".to_string(), runtime_root.display().to_string()),
        ("WORKSPACE_ROOT".to_string(), workspace_root.display().to_string()),
    ];

    if let Some(proxy) = &cfg.proxy_url {
        env.push(("PROXY".to_string(), proxy.clone()));
    }
    if let Some(checksum_db) = &cfg.checksum_db {
        env.push(("CHECKSUM_DB".to_string(), checksum_db.clone()));
    }

    let bin_dir = installed
        .path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| installed.path.clone());
    env.push(("PATH_PREPEND".to_string(), bin_dir.display().to_string()));

    env
}

fn workspace_root_for(cfg: &Configuration, canonical_version: &str, home_dir: Option<&Path>) -> PathBuf {
    match cfg.workspace_mode {
        WorkspaceMode::Shared => home_dir
            .map(|h| h.join("toolchain-workspace"))
            .unwrap_or_else(|| PathBuf::from("toolchain-workspace")),
        WorkspaceMode::VersionSpecific => cfg.install_dir.join("workspace").join(canonical_version),
        WorkspaceMode::Custom => PathBuf::from(cfg.custom_workspace.clone().unwrap_or_default()),
    }
}

/// Render `env` as a POSIX-sh-compatible `export KEY=VALUE` script, one
/// line per entry in order (§6). The concrete shell dialect for the
/// generated init script lives outside the core; this is the `.env` file
/// format every dialect sources.
pub fn render_posix_script(env: &EnvironmentMap) -> String {
    let mut out = String::new();
    for (key, value) in env {
        out.push_str(&format!("export {key}={}\n", shell_quote(value)));
    }
    out
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tvm_core::version::Version;

    fn installed(path: &Path) -> InstalledVersion {
        InstalledVersion {
            version: Version::parse("1.21.0").unwrap(),
            os: "linux".to_string(),
            arch: "amd64".to_string(),
            installed_at: Utc::now(),
            is_active: true,
            is_system: false,
            path: path.to_path_buf(),
        }
    }

    #[test]
    fn shared_mode_resolves_against_home() {
        let cfg = Configuration {
            workspace_mode: WorkspaceMode::Shared,
            ..Configuration::default()
        };
        let path = PathBuf::from("/root/.local/tvm/versions/v1.21.0/bin/go");
        let env = environment_for(&cfg, &installed(&path), Some(Path::new("/home/tester")));

        let workspace = env.iter().find(|(k, _)| k == "WORKSPACE_ROOT").unwrap();
        assert_eq!(workspace.1, "/home/tester/toolchain-workspace");
    }

    #[test]
    fn version_specific_mode_nests_under_install_dir() {
        let cfg = Configuration {
            workspace_mode: WorkspaceMode::VersionSpecific,
            install_dir: PathBuf::from("/opt/tvm/versions"),
            ..Configuration::default()
        };
        let path = PathBuf::from("/opt/tvm/versions/v1.21.0/bin/go");
        let env = environment_for(&cfg, &installed(&path), None);

        let workspace = env.iter().find(|(k, _)| k == "WORKSPACE_ROOT").unwrap();
        assert_eq!(workspace.1, "/opt/tvm/versions/workspace/v1.21.0");
    }

    #[test]
    fn custom_mode_uses_literal_value() {
        let cfg = Configuration {
            workspace_mode: WorkspaceMode::Custom,
            custom_workspace: Some("/srv/shared-workspace".to_string()),
            ..Configuration::default()
        };
        let path = PathBuf::from("/opt/tvm/versions/v1.21.0/bin/go");
        let env = environment_for(&cfg, &installed(&path), None);

        let workspace = env.iter().find(|(k, _)| k == "WORKSPACE_ROOT").unwrap();
        assert_eq!(workspace.1, "/srv/shared-workspace");
    }

    #[test]
    fn render_posix_script_produces_export_lines_in_order() {
        let env = vec![
            ("RUNTIME_ROOT".to_string(), "/opt/tvm/versions/v1.21.0".to_string()),
            ("PATH_PREPEND".to_string(), "/opt/tvm/versions/v1.21.0/bin".to_string()),
        ];
        let script = render_posix_script(&env);
        assert_eq!(
            script,
            "export RUNTIME_ROOT='/opt/tvm/versions/v1.21.0'\nexport PATH_PREPEND='/opt/tvm/versions/v1.21.0/bin'\n"
        );
    }
}
