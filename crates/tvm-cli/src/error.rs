//! Error taxonomy and rendering at the stdout/stderr boundary (§7).
//!
//! The core crates never know about text-vs-JSON rendering; this module is
//! where a `tvm_manager::Error` (or a configuration/IO failure surfacing
//! before a `Manager` even exists) becomes a line of text or a
//! `{error: {...}}` JSON object.

use colored::*;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Manager(#[from] tvm_manager::Error),

    #[error(transparent)]
    Config(#[from] tvm_config::ConfigError),
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// Maps a `CliError` onto one of the kinds enumerated in the error
/// taxonomy, not a Rust type name.
fn kind_of(err: &CliError) -> &'static str {
    use tvm_manager::Error as M;

    match err {
        CliError::Config(_) => "ConfigError",
        CliError::Manager(m) => match m {
            M::Config(_) => "ConfigError",
            M::Catalog(c) => match c {
                tvm_catalog::Error::Network { .. } => "NetworkError",
                tvm_catalog::Error::Http { .. } => "NetworkError",
                tvm_catalog::Error::Decode { .. } => "DecodeError",
                tvm_catalog::Error::ChecksumDb { .. } => "ChecksumDbError",
            },
            M::Install(i) => match i {
                tvm_installer::Error::Network { .. } | tvm_installer::Error::Http { .. } => "NetworkError",
                tvm_installer::Error::VersionNotAvailable { .. } => "VersionNotAvailable",
                tvm_installer::Error::NoArtifactForPlatform { .. } => "NoArtifactForPlatform",
                tvm_installer::Error::ChecksumMismatch { .. } => "ChecksumMismatch",
                tvm_installer::Error::AlreadyInstalled { .. } => "AlreadyInstalled",
                tvm_installer::Error::CorruptInstall { .. } => "CorruptInstall",
                tvm_installer::Error::UnsupportedFormat { .. } => "CorruptInstall",
                tvm_installer::Error::Cancelled => "Cancelled",
                _ => "UninstallFailed",
            },
            M::System(_) => "NoSystemToolchain",
            M::Paths(p) => match p {
                tvm_paths::Error::Busy { .. } => "Busy",
                tvm_paths::Error::LinkFailed { .. } => "LinkFailed",
                _ => "LinkFailed",
            },
            M::InvalidArgument(_) => "InvalidArgument",
            M::AlreadyInstalled(_) => "AlreadyInstalled",
            M::NotInstalled(_) => "NotInstalled",
            M::AliasExists(_) => "AliasExists",
            M::AliasNotFound(_) => "AliasNotFound",
            M::NoSystemToolchain => "NoSystemToolchain",
            M::NoActiveVersion => "NoActiveVersion",
            M::ActiveVersionInUse(_) => "UninstallFailed",
            M::Io { .. } => "Io",
            M::Cancelled => "Cancelled",
        },
    }
}

/// A remediation hint shown in text mode and carried as `hint` in JSON mode,
/// for the handful of kinds where one is obvious and actionable.
fn hint_for(kind: &str) -> Option<String> {
    match kind {
        "NotInstalled" => Some("run 'tvm list' to see installed versions".to_string()),
        "AliasNotFound" => Some("run 'tvm alias list' to see defined aliases".to_string()),
        "NoActiveVersion" => Some("run 'tvm use <version>' to activate one".to_string()),
        "AliasExists" => Some("pass --force to overwrite the existing alias".to_string()),
        _ => None,
    }
}

/// Render `err` to stdout/stderr per the active output mode and return the
/// process exit code. `Cancelled` is rendered silently, matching the
/// front-end contract in §7.
pub fn render(err: &CliError, json: bool) -> i32 {
    let kind = kind_of(err);

    if matches!(err, CliError::Manager(tvm_manager::Error::Cancelled)) {
        return 1;
    }

    if json {
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                kind,
                message: err.to_string(),
                hint: hint_for(kind),
                path: None,
            },
        };
        println!("{}", serde_json::to_string(&envelope).expect("ErrorEnvelope always serializes"));
        return 1;
    }

    eprintln!("{} {}", "error:".red().bold(), err);
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
        source = cause.source();
    }
    if let Some(hint) = hint_for(kind) {
        eprintln!("  {} {}", "hint:".cyan(), hint);
    }
    1
}
