//! Alias Store (§4.F "alias management"): user-defined short names pointing
//! at a canonical version, persisted as a single write-temp-then-rename
//! JSON file.

use crate::error::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tvm_core::model::Alias;
use tvm_core::ports::{Confirmation, InputPrompter};
use tvm_core::reserved::{is_reserved, is_valid_name_shape};
use tvm_core::version::Version;

/// Conflict-resolution policy for `create`/`import` (§4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverridePolicy {
    /// Prompt via `InputPrompter`; a `No`/`Cancel` answer is treated as a
    /// conflict error.
    Interactive,
    /// Always overwrite an existing alias.
    Force,
    /// Overwrite an existing alias without prompting.
    AllowOverride,
    /// Never overwrite, even in interactive mode — terminal on conflict.
    NoOverride,
}

#[derive(Debug, Serialize, Deserialize)]
struct AliasFile {
    version: u32,
    aliases: Vec<Alias>,
}

impl Default for AliasFile {
    fn default() -> Self {
        Self {
            version: 1,
            aliases: Vec::new(),
        }
    }
}

/// Owns the on-disk aliases file at `<root>/state/aliases.json`.
pub struct AliasStore {
    path: PathBuf,
}

impl AliasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<AliasFile> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents).unwrap_or_default()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(AliasFile::default()),
            Err(source) => Err(Error::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, file: &AliasFile) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let body = serde_json::to_string_pretty(file).expect("AliasFile always serializes");
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        std::io::Write::write_all(&mut tmp, body.as_bytes()).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        tmp.persist(&self.path).map_err(|e| Error::Io {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }

    fn validate_name(name: &str) -> Result<()> {
        if !is_valid_name_shape(name) {
            return Err(Error::InvalidArgument(format!(
                "'{name}' is not a valid alias name (1-50 chars, [A-Za-z0-9._-]+)"
            )));
        }
        if is_reserved(name) {
            return Err(Error::InvalidArgument(format!("'{name}' is a reserved name")));
        }
        Ok(())
    }

    pub fn create(
        &self,
        name: &str,
        version: &Version,
        policy: OverridePolicy,
        prompter: &dyn InputPrompter,
    ) -> Result<()> {
        Self::validate_name(name)?;
        let mut file = self.load()?;
        let now = Utc::now();

        if let Some(existing) = file.aliases.iter_mut().find(|a| a.name == name) {
            match policy {
                OverridePolicy::NoOverride => return Err(Error::AliasExists(name.to_string())),
                OverridePolicy::Force | OverridePolicy::AllowOverride => {
                    existing.version = version.clone();
                    existing.updated_at = now;
                }
                OverridePolicy::Interactive => {
                    match prompter.confirm(&format!("Alias '{name}' already exists. Overwrite?")) {
                        Confirmation::Yes => {
                            existing.version = version.clone();
                            existing.updated_at = now;
                        }
                        Confirmation::No | Confirmation::Cancel => {
                            return Err(Error::AliasExists(name.to_string()))
                        }
                    }
                }
            }
            return self.save(&file);
        }

        file.aliases.push(Alias {
            name: name.to_string(),
            version: version.clone(),
            created_at: now,
            updated_at: now,
        });
        self.save(&file)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let mut file = self.load()?;
        let before = file.aliases.len();
        file.aliases.retain(|a| a.name != name);
        if file.aliases.len() == before {
            return Err(Error::AliasNotFound(name.to_string()));
        }
        self.save(&file)
    }

    pub fn list(&self) -> Result<Vec<Alias>> {
        let mut file = self.load()?;
        file.aliases.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(file.aliases)
    }

    pub fn resolve(&self, name: &str) -> Result<Version> {
        let file = self.load()?;
        file.aliases
            .into_iter()
            .find(|a| a.name == name)
            .map(|a| a.version)
            .ok_or_else(|| Error::AliasNotFound(name.to_string()))
    }

    pub fn by_version(&self, version: &Version) -> Result<Vec<Alias>> {
        let file = self.load()?;
        Ok(file
            .aliases
            .into_iter()
            .filter(|a| &a.version == version)
            .collect())
    }

    pub fn export(&self, dest: &Path) -> Result<()> {
        let file = self.load()?;
        let body = serde_json::to_string_pretty(&file).expect("AliasFile always serializes");
        std::fs::write(dest, body).map_err(|source| Error::Io {
            path: dest.to_path_buf(),
            source,
        })
    }

    pub fn import(&self, src: &Path, policy: OverridePolicy, prompter: &dyn InputPrompter) -> Result<()> {
        let contents = std::fs::read_to_string(src).map_err(|source| Error::Io {
            path: src.to_path_buf(),
            source,
        })?;
        let incoming: AliasFile = serde_json::from_str(&contents).map_err(|source| Error::Io {
            path: src.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, source),
        })?;

        for alias in incoming.aliases {
            self.create(&alias.name, &alias.version, policy, prompter)?;
        }
        Ok(())
    }
}

/// A stable, deterministic list of suggested alias names derived from a
/// version's major/minor and common labels (§4.F `suggest`). Pure, no I/O.
pub fn suggest(version: &Version) -> Vec<String> {
    vec![
        format!("v{}-{}", version.major(), version.minor()),
        format!("latest-{}.x", version.major()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvm_core::ports::AlwaysDeclinePrompter;

    fn store(dir: &Path) -> AliasStore {
        AliasStore::new(dir.join("aliases.json"))
    }

    #[test]
    fn create_then_resolve_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let version = Version::parse("1.21.0").unwrap();

        store
            .create("stable", &version, OverridePolicy::NoOverride, &AlwaysDeclinePrompter)
            .unwrap();

        assert_eq!(store.resolve("stable").unwrap(), version);
    }

    #[test]
    fn create_rejects_reserved_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let version = Version::parse("1.21.0").unwrap();

        let err = store
            .create("system", &version, OverridePolicy::Force, &AlwaysDeclinePrompter)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn create_no_override_fails_on_conflict() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let v1 = Version::parse("1.21.0").unwrap();
        let v2 = Version::parse("1.22.0").unwrap();

        store
            .create("stable", &v1, OverridePolicy::NoOverride, &AlwaysDeclinePrompter)
            .unwrap();
        let err = store
            .create("stable", &v2, OverridePolicy::NoOverride, &AlwaysDeclinePrompter)
            .unwrap_err();
        assert!(matches!(err, Error::AliasExists(_)));
    }

    #[test]
    fn interactive_decline_is_a_conflict_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let v1 = Version::parse("1.21.0").unwrap();
        let v2 = Version::parse("1.22.0").unwrap();

        store
            .create("stable", &v1, OverridePolicy::Force, &AlwaysDeclinePrompter)
            .unwrap();
        let err = store
            .create("stable", &v2, OverridePolicy::Interactive, &AlwaysDeclinePrompter)
            .unwrap_err();
        assert!(matches!(err, Error::AliasExists(_)));
    }

    #[test]
    fn remove_missing_alias_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        assert!(matches!(store.remove("ghost"), Err(Error::AliasNotFound(_))));
    }

    #[test]
    fn list_is_alphabetical() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let version = Version::parse("1.21.0").unwrap();

        store.create("zeta", &version, OverridePolicy::Force, &AlwaysDeclinePrompter).unwrap();
        store.create("alpha", &version, OverridePolicy::Force, &AlwaysDeclinePrompter).unwrap();

        let names: Vec<_> = store.list().unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[test]
    fn export_then_import_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store_a = store(&tmp.path().join("a"));
        let store_b = store(&tmp.path().join("b"));
        let version = Version::parse("1.21.0").unwrap();

        store_a.create("stable", &version, OverridePolicy::Force, &AlwaysDeclinePrompter).unwrap();
        let export_path = tmp.path().join("aliases-export.json");
        store_a.export(&export_path).unwrap();

        store_b.import(&export_path, OverridePolicy::Force, &AlwaysDeclinePrompter).unwrap();
        assert_eq!(store_b.resolve("stable").unwrap(), version);
    }

    #[test]
    fn suggest_is_deterministic() {
        let version = Version::parse("1.21.0").unwrap();
        assert_eq!(suggest(&version), suggest(&version));
        assert_eq!(suggest(&version), vec!["v1-21".to_string(), "latest-1.x".to_string()]);
    }
}
