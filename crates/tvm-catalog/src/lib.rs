//! Component B — Catalog Client (§4.B).

mod error;
mod wire;

pub use error::{Error, Result};

use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::warn;
use tvm_core::model::{ArtifactKind, AvailableRelease, ReleaseFile};
use tvm_core::version::Version;

/// Client for the mirror's release catalog.
pub struct CatalogClient {
    http: reqwest::Client,
    mirror_url: String,
}

fn retry_strategy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(8))
        .with_factor(2.0)
        .with_jitter()
        .with_max_times(5)
}

impl CatalogClient {
    pub fn new(mirror_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            mirror_url: mirror_url.into(),
        }
    }

    pub fn with_client(http: reqwest::Client, mirror_url: impl Into<String>) -> Self {
        Self {
            http,
            mirror_url: mirror_url.into(),
        }
    }

    /// Fetch and decode the catalog, returning releases for all platforms,
    /// newest first. Transient HTTP 5xx/network errors are retried with
    /// exponential backoff (base 500ms, factor 2, jitter, cap 8s, 5 attempts);
    /// 4xx responses are terminal.
    pub async fn list_available(&self) -> Result<Vec<AvailableRelease>> {
        let url = format!("{}/?mode=json&include=all", self.mirror_url.trim_end_matches('/'));

        let body = (|| async { self.fetch_once(&url).await })
            .retry(retry_strategy())
            .when(|e: &Error| e.is_recoverable())
            .await?;

        let wire: Vec<wire::CatalogEntryWire> =
            serde_json::from_str(&body).map_err(|source| Error::Decode {
                url: url.clone(),
                source,
            })?;

        let mut releases: Vec<AvailableRelease> = wire
            .into_iter()
            .filter_map(|entry| match Version::parse(&entry.version) {
                Ok(version) => Some(AvailableRelease {
                    version,
                    stable: entry.stable,
                    files: entry
                        .files
                        .into_iter()
                        .filter_map(|f| {
                            let kind = match f.kind.as_str() {
                                "archive" => ArtifactKind::Archive,
                                "installer" => ArtifactKind::Installer,
                                "source" => ArtifactKind::Source,
                                other => {
                                    warn!("skipping catalog file with unknown kind '{other}'");
                                    return None;
                                }
                            };
                            Some(ReleaseFile {
                                filename: f.filename,
                                os: f.os,
                                arch: f.arch,
                                sha256: f.sha256,
                                size: f.size,
                                kind,
                            })
                        })
                        .collect(),
                }),
                Err(e) => {
                    warn!("skipping unparseable catalog entry '{}': {e}", entry.version);
                    None
                }
            })
            .collect();

        releases.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(releases)
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Network {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(Error::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })
    }

    /// Cross-check `primary` (catalog-declared) against a configured
    /// secondary checksum database. A disagreement is terminal.
    pub async fn verify_checksum_db(
        &self,
        checksum_db_url: &str,
        filename: &str,
        primary_sha256: &str,
    ) -> Result<()> {
        let url = format!("{}/{}", checksum_db_url.trim_end_matches('/'), filename);
        let secondary = (|| async { self.fetch_once(&url).await })
            .retry(retry_strategy())
            .when(|e: &Error| e.is_recoverable())
            .await?;
        let secondary = secondary.trim();

        if !secondary.eq_ignore_ascii_case(primary_sha256) {
            return Err(Error::ChecksumDb {
                filename: filename.to_string(),
                primary: primary_sha256.to_string(),
                secondary: secondary.to_string(),
            });
        }
        Ok(())
    }
}

/// Pure classification: a version string is non-stable if it contains (case
/// insensitively) any of `beta`, `rc`, `devel`, `alpha` as a substring. This
/// is independent of `Version::is_stable`'s structural suffix grammar and is
/// used to double-check mirror-declared stability when filtering.
pub fn is_stable_version_string(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    !["beta", "rc", "devel", "alpha"]
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Filter `releases` down to stable-only entries (pure, no I/O).
pub fn stable_only(releases: &[AvailableRelease]) -> Vec<AvailableRelease> {
    releases
        .iter()
        .filter(|r| r.stable && is_stable_version_string(&r.version.canonical()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_stability_by_substring() {
        assert!(is_stable_version_string("1.21.0"));
        assert!(!is_stable_version_string("1.21.0-beta1"));
        assert!(!is_stable_version_string("1.21.0RC1"));
        assert!(!is_stable_version_string("1.21.0-devel"));
    }

    #[test]
    fn stable_only_filters_unstable_releases() {
        let releases = vec![
            AvailableRelease {
                version: Version::parse("1.21.0").unwrap(),
                stable: true,
                files: vec![],
            },
            AvailableRelease {
                version: Version::parse("1.22.0rc1").unwrap(),
                stable: false,
                files: vec![],
            },
        ];
        let filtered = stable_only(&releases);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].version.canonical(), "v1.21.0");
    }
}
