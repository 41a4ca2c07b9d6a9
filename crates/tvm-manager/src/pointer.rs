//! ActiveVersionPointer (§3, §4.F "state machine — active-version pointer").
//!
//! Line-oriented, UTF-8, LF format:
//! ```text
//! active_version=<canonical>
//! activated_at=<ISO-8601 UTC>
//! ```
//! Readers tolerate unknown lines for forward compatibility.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tvm_core::version::Version;

/// The pointer's state, as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerState {
    /// No pointer file exists yet.
    Unset,
    /// Points at `version`, which is confirmed to exist on disk.
    Set { version: Version, activated_at: DateTime<Utc> },
    /// Points at a version that is `Some(reserved sentinel)` is not possible
    /// here — this variant covers a version directory that no longer
    /// exists.
    Dangling { version: Version, activated_at: DateTime<Utc> },
}

/// Read the raw pointer contents without checking whether the referenced
/// version still exists; callers combine this with `list_installed` (or a
/// system-detection result) to classify `Set` vs `Dangling`.
pub fn read_raw(path: &Path) -> Result<Option<(Version, DateTime<Utc>)>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut raw_version = None;
    let mut activated_at = None;

    for line in contents.lines() {
        if let Some(value) = line.strip_prefix("active_version=") {
            raw_version = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix("activated_at=") {
            activated_at = DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    let Some(raw_version) = raw_version else {
        return Ok(None);
    };
    let Ok(version) = Version::parse(&raw_version) else {
        return Ok(None);
    };

    Ok(Some((version, activated_at.unwrap_or_else(Utc::now))))
}

/// Classify a raw pointer read against whether its version actually
/// resolves (to a managed install or the detected system toolchain),
/// producing the §4.F state-machine value callers report on.
pub fn classify(raw: Option<(Version, DateTime<Utc>)>, resolves: bool) -> PointerState {
    match raw {
        None => PointerState::Unset,
        Some((version, activated_at)) if resolves => PointerState::Set { version, activated_at },
        Some((version, activated_at)) => PointerState::Dangling { version, activated_at },
    }
}

/// Write the pointer via write-temp-then-rename within `path`'s own
/// directory, so a concurrent reader always observes either the previous
/// content or the new content.
pub fn write(path: &Path, version: &Version, activated_at: DateTime<Utc>) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let body = format!(
        "active_version={}\nactivated_at={}\n",
        version.canonical(),
        activated_at.to_rfc3339()
    );

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    std::io::Write::write_all(&mut tmp, body.as_bytes()).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.persist(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_raw_returns_none_for_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("active-version");
        assert_eq!(read_raw(&path).unwrap(), None);
    }

    #[test]
    fn write_then_read_raw_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state").join("active-version");
        let version = Version::parse("1.21.0").unwrap();
        let now = Utc::now();

        write(&path, &version, now).unwrap();
        let (read_version, read_at) = read_raw(&path).unwrap().unwrap();

        assert_eq!(read_version, version);
        assert_eq!(read_at.timestamp(), now.timestamp());
    }

    #[test]
    fn classify_reports_unset_set_and_dangling() {
        let version = Version::parse("1.21.0").unwrap();
        let now = Utc::now();

        assert_eq!(classify(None, false), PointerState::Unset);
        assert_eq!(
            classify(Some((version.clone(), now)), true),
            PointerState::Set { version: version.clone(), activated_at: now }
        );
        assert_eq!(
            classify(Some((version.clone(), now)), false),
            PointerState::Dangling { version, activated_at: now }
        );
    }

    #[test]
    fn read_raw_tolerates_unknown_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("active-version");
        std::fs::write(&path, "active_version=v1.21.0\nfuture_field=xyz\n").unwrap();

        let (version, _) = read_raw(&path).unwrap().unwrap();
        assert_eq!(version, Version::parse("1.21.0").unwrap());
    }
}
