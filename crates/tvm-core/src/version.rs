//! Canonical version identifiers.
//!
//! Canonical form is `vX.Y[.Z][suffix]` where `suffix` is one of
//! `rc\d+`, `beta\d+` or `alpha\d+`. Both bare (`1.21.0`) and prefixed
//! (`go1.21.0`) forms are accepted on input and normalised to the prefixed
//! `v` form for keys and filenames. `system`/`sys` are handled by callers
//! (`tvm-manager`), not here: this module only knows about real versions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// `vX.Y[.Z][suffix]`, suffix in {rc, beta, alpha} + digits.
static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:v|go)?(\d+)\.(\d+)(?:\.(\d+))?(rc|beta|alpha)?(\d+)?$").unwrap()
});

#[derive(Debug, Clone, thiserror::Error)]
#[error("'{0}' is not a valid version (expected vX.Y[.Z][rc|beta|alpha][N])")]
pub struct ParseVersionError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suffix {
    Alpha(u32),
    Beta(u32),
    Rc(u32),
}

impl Suffix {
    fn rank(self) -> u8 {
        match self {
            Suffix::Alpha(_) => 0,
            Suffix::Beta(_) => 1,
            Suffix::Rc(_) => 2,
        }
    }

    fn number(self) -> u32 {
        match self {
            Suffix::Alpha(n) | Suffix::Beta(n) | Suffix::Rc(n) => n,
        }
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suffix::Alpha(n) => write!(f, "alpha{n}"),
            Suffix::Beta(n) => write!(f, "beta{n}"),
            Suffix::Rc(n) => write!(f, "rc{n}"),
        }
    }
}

/// A parsed, canonical toolchain version.
///
/// `Ord` treats a prerelease as older than its corresponding stable release
/// (`v1.21.0rc1 < v1.21.0`), then orders prereleases among themselves by
/// kind (alpha < beta < rc) and then by their numeric suffix.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
    suffix: Option<Suffix>,
}

// Versions serialize as their canonical string (`"v1.21.0"`), matching the
// on-disk JSON schemas in aliases.json and the catalog payload — never as a
// struct of fields.
impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(D::Error::custom)
    }
}

impl Version {
    pub fn parse(input: &str) -> Result<Self, ParseVersionError> {
        let input = input.trim();
        let caps = VERSION_RE
            .captures(input)
            .ok_or_else(|| ParseVersionError(input.to_string()))?;

        let major: u32 = caps[1].parse().unwrap();
        let minor: u32 = caps[2].parse().unwrap();
        let patch: u32 = caps
            .get(3)
            .map(|m| m.as_str().parse().unwrap())
            .unwrap_or(0);

        let suffix = match (caps.get(4), caps.get(5)) {
            (Some(kind), Some(num)) => {
                let num: u32 = num.as_str().parse().unwrap();
                Some(match kind.as_str().to_ascii_lowercase().as_str() {
                    "alpha" => Suffix::Alpha(num),
                    "beta" => Suffix::Beta(num),
                    "rc" => Suffix::Rc(num),
                    other => unreachable!("regex only captures alpha|beta|rc, got {other}"),
                })
            }
            (None, None) => None,
            _ => return Err(ParseVersionError(input.to_string())),
        };

        Ok(Self {
            major,
            minor,
            patch,
            suffix,
        })
    }

    /// Canonical `vX.Y.Z[suffix]` form used for keys, directory names and filenames.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn is_stable(&self) -> bool {
        self.suffix.is_none()
    }

    pub fn major_minor_key(&self) -> String {
        format!("{}-{}", self.major, self.minor)
    }

    /// True when `other`'s numeric triple matches, regardless of suffix case
    /// or presence — used to compare a manager-known canonical version
    /// against a raw string a toolchain binary printed on stdout.
    pub fn numerically_matches(&self, raw: &str) -> bool {
        match Version::parse(raw) {
            Ok(other) => {
                self.major == other.major && self.minor == other.minor && self.patch == other.patch
            }
            Err(_) => false,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.suffix, other.suffix) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.rank().cmp(&b.rank()).then(a.number().cmp(&b.number())),
            })
    }
}

impl std::hash::Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl std::str::FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_prefixed_forms() {
        assert_eq!(Version::parse("1.21.0").unwrap().canonical(), "v1.21.0");
        assert_eq!(Version::parse("go1.21.0").unwrap().canonical(), "v1.21.0");
        assert_eq!(Version::parse("v1.21.0").unwrap().canonical(), "v1.21.0");
    }

    #[test]
    fn parses_missing_patch_as_zero() {
        assert_eq!(Version::parse("1.21").unwrap().canonical(), "v1.21.0");
    }

    #[test]
    fn parses_prerelease_suffixes_case_insensitively() {
        assert_eq!(Version::parse("1.22.0RC1").unwrap().canonical(), "v1.22.0rc1");
        assert_eq!(Version::parse("go1.22.0beta3").unwrap().canonical(), "v1.22.0beta3");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Version::parse("not-a-version").is_err());
        assert!(Version::parse("1.x.0").is_err());
    }

    #[test]
    fn stability_classification() {
        assert!(Version::parse("1.21.0").unwrap().is_stable());
        assert!(!Version::parse("1.21.0rc1").unwrap().is_stable());
    }

    #[test]
    fn orders_prerelease_before_stable() {
        let rc = Version::parse("1.21.0rc1").unwrap();
        let stable = Version::parse("1.21.0").unwrap();
        assert!(rc < stable);
    }

    #[test]
    fn orders_prerelease_kinds() {
        let alpha = Version::parse("1.21.0alpha1").unwrap();
        let beta = Version::parse("1.21.0beta1").unwrap();
        let rc = Version::parse("1.21.0rc1").unwrap();
        assert!(alpha < beta);
        assert!(beta < rc);
    }

    #[test]
    fn numerically_matches_ignores_suffix() {
        let v = Version::parse("1.21.0").unwrap();
        assert!(v.numerically_matches("go1.21.0"));
        assert!(!v.numerically_matches("go1.21.1"));
    }
}
