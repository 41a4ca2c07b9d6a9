//! Integration tests for the switch protocol and surrounding lifecycle
//! (§4.F, §8 scenarios): install, use, current, list_installed, uninstall,
//! and alias resolution, driven against a wiremock-served mirror.

use std::io::Write;
use std::path::Path;
use tvm_core::ports::{AlwaysDeclinePrompter, MapEnvironmentProvider, NoopProgressSink, NeverCancel};
use tvm_core::version::Version;
use tvm_manager::{Manager, OverridePolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VERSION: &str = "1.21.0";

fn fake_archive_bytes() -> Vec<u8> {
    let script = b"#!/bin/sh\necho \"go version go1.21.0 linux/amd64\"\n";

    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_path("go/bin/go").unwrap();
    header.set_size(script.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append(&header, &script[..]).unwrap();
    let tar_bytes = builder.into_inner().unwrap();

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&tar_bytes).unwrap();
    encoder.finish().unwrap()
}

fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

async fn mock_mirror() -> (MockServer, String) {
    let server = MockServer::start().await;
    let archive = fake_archive_bytes();
    let filename = format!("toolchain-{VERSION}-linux-amd64.tar.gz");
    let sha256 = sha256_hex(&archive);

    let catalog_json = serde_json::json!([
        {
            "version": VERSION,
            "stable": true,
            "files": [
                {
                    "filename": filename,
                    "os": "linux",
                    "arch": "amd64",
                    "sha256": sha256,
                    "size": archive.len(),
                    "kind": "archive",
                }
            ]
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_json))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{filename}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
        .mount(&server)
        .await;

    (server, filename)
}

fn test_config(root: &Path, mirror_url: String) -> tvm_config::Configuration {
    tvm_config::Configuration {
        install_dir: root.join("root"),
        download_dir: root.join("root").join("downloads"),
        mirror_url,
        auto_cleanup: false,
        max_versions: 5,
        workspace_mode: tvm_config::WorkspaceMode::Shared,
        custom_workspace: None,
        proxy_url: None,
        checksum_db: None,
        set_environment: true,
    }
}

fn env(tmp: &Path) -> MapEnvironmentProvider {
    MapEnvironmentProvider::new(tmp.join("home")).with_var("PATH", "/nonexistent-bin")
}

#[tokio::test]
async fn install_then_use_then_current_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    let (server, _filename) = mock_mirror().await;
    let cfg = test_config(tmp.path(), server.uri());
    let manager = Manager::new(&cfg);
    let env = env(tmp.path());
    let version = Version::parse(VERSION).unwrap();

    let installed = manager
        .install(&cfg, &version, "linux", "amd64", &NoopProgressSink, &NeverCancel)
        .await
        .unwrap();
    assert_eq!(installed.version, version);
    assert!(!installed.is_active);

    let (switched, warning) = manager.use_version(&cfg, VERSION, &env).unwrap();
    assert!(switched.is_active);
    assert!(warning.is_none());

    let current = manager.current(&cfg, &env).unwrap();
    assert_eq!(current.version, version);
    assert!(current.is_active);
}

#[tokio::test]
async fn install_twice_fails_already_installed() {
    let tmp = tempfile::tempdir().unwrap();
    let (server, _filename) = mock_mirror().await;
    let cfg = test_config(tmp.path(), server.uri());
    let manager = Manager::new(&cfg);
    let version = Version::parse(VERSION).unwrap();

    manager
        .install(&cfg, &version, "linux", "amd64", &NoopProgressSink, &NeverCancel)
        .await
        .unwrap();

    let err = manager
        .install(&cfg, &version, "linux", "amd64", &NoopProgressSink, &NeverCancel)
        .await
        .unwrap_err();
    assert!(matches!(err, tvm_manager::Error::AlreadyInstalled(_)));
}

#[tokio::test]
async fn uninstall_refuses_active_version() {
    let tmp = tempfile::tempdir().unwrap();
    let (server, _filename) = mock_mirror().await;
    let cfg = test_config(tmp.path(), server.uri());
    let manager = Manager::new(&cfg);
    let env = env(tmp.path());
    let version = Version::parse(VERSION).unwrap();

    manager
        .install(&cfg, &version, "linux", "amd64", &NoopProgressSink, &NeverCancel)
        .await
        .unwrap();
    manager.use_version(&cfg, VERSION, &env).unwrap();

    let err = manager.uninstall(&cfg, &version).unwrap_err();
    assert!(matches!(err, tvm_manager::Error::ActiveVersionInUse(_)));
}

#[tokio::test]
async fn uninstall_missing_version_fails_not_installed() {
    let tmp = tempfile::tempdir().unwrap();
    let (server, _filename) = mock_mirror().await;
    let cfg = test_config(tmp.path(), server.uri());
    let manager = Manager::new(&cfg);
    let version = Version::parse(VERSION).unwrap();

    let err = manager.uninstall(&cfg, &version).unwrap_err();
    assert!(matches!(err, tvm_manager::Error::NotInstalled(_)));
}

#[tokio::test]
async fn use_unknown_version_fails_not_installed() {
    let tmp = tempfile::tempdir().unwrap();
    let (server, _filename) = mock_mirror().await;
    let cfg = test_config(tmp.path(), server.uri());
    let manager = Manager::new(&cfg);
    let env = env(tmp.path());

    let err = manager.use_version(&cfg, VERSION, &env).unwrap_err();
    assert!(matches!(err, tvm_manager::Error::NotInstalled(_)));
}

#[tokio::test]
async fn use_by_alias_resolves_to_stored_version() {
    let tmp = tempfile::tempdir().unwrap();
    let (server, _filename) = mock_mirror().await;
    let cfg = test_config(tmp.path(), server.uri());
    let manager = Manager::new(&cfg);
    let env = env(tmp.path());
    let version = Version::parse(VERSION).unwrap();

    manager
        .install(&cfg, &version, "linux", "amd64", &NoopProgressSink, &NeverCancel)
        .await
        .unwrap();
    manager
        .create_alias("stable", &version, OverridePolicy::Force, &AlwaysDeclinePrompter)
        .unwrap();

    let (switched, _) = manager.use_version(&cfg, "stable", &env).unwrap();
    assert_eq!(switched.version, version);
}

#[tokio::test]
async fn list_installed_marks_active_entry() {
    let tmp = tempfile::tempdir().unwrap();
    let (server, _filename) = mock_mirror().await;
    let cfg = test_config(tmp.path(), server.uri());
    let manager = Manager::new(&cfg);
    let env = env(tmp.path());
    let version = Version::parse(VERSION).unwrap();

    manager
        .install(&cfg, &version, "linux", "amd64", &NoopProgressSink, &NeverCancel)
        .await
        .unwrap();
    manager.use_version(&cfg, VERSION, &env).unwrap();

    let installed = manager.list_installed(&cfg, &env).unwrap();
    assert_eq!(installed.len(), 1);
    assert!(installed[0].is_active);
}

#[tokio::test]
async fn current_without_a_switch_fails_no_active_version() {
    let tmp = tempfile::tempdir().unwrap();
    let (server, _filename) = mock_mirror().await;
    let cfg = test_config(tmp.path(), server.uri());
    let manager = Manager::new(&cfg);
    let env = env(tmp.path());

    let err = manager.current(&cfg, &env).unwrap_err();
    assert!(matches!(err, tvm_manager::Error::NoActiveVersion));
}
