//! Component C — Downloader (§4.C).

use crate::error::{Error, Result};
use backon::{ExponentialBuilder, Retryable};
use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use tvm_core::model::{AvailableRelease, ReleaseFile};
use tvm_core::ports::{CancellationToken, ProgressSink};

/// Downloads and SHA-256-verifies a single release artifact.
pub struct Downloader {
    http: reqwest::Client,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

fn retry_strategy() -> ExponentialBuilder {
    // §4.C: at most 3 attempts per download, same backoff shape as the catalog.
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(8))
        .with_factor(2.0)
        .with_jitter()
        .with_max_times(3)
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client builder should not fail with default TLS config"),
        }
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Pick the file matching `os`/`arch` with the platform's preferred
    /// archive kind (tarball on Unix, ZIP on Windows — in practice each OS
    /// publishes exactly one archive, so matching on os/arch/kind suffices).
    pub fn choose_file<'a>(
        release: &'a AvailableRelease,
        os: &str,
        arch: &str,
    ) -> Result<&'a ReleaseFile> {
        release
            .file_for(os, arch)
            .ok_or_else(|| Error::NoArtifactForPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
    }

    /// Download `file` from `<mirror_url>/<filename>` into `download_dir`,
    /// verifying its SHA-256 against `file.sha256` (and its size, if
    /// declared). Returns the absolute path to the verified archive.
    pub async fn download(
        &self,
        mirror_url: &str,
        file: &ReleaseFile,
        download_dir: &Path,
        progress: &dyn ProgressSink,
        cancel: &dyn CancellationToken,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(download_dir).map_err(|source| Error::Io {
            path: download_dir.to_path_buf(),
            source,
        })?;

        let url = format!("{}/{}", mirror_url.trim_end_matches('/'), file.filename);
        let partial_path = download_dir.join(format!("{}.partial", file.filename));
        let final_path = download_dir.join(&file.filename);

        let result = (|| async {
            self.download_once(&url, file, &partial_path, progress, cancel)
                .await
        })
        .retry(retry_strategy())
        .notify(|err: &Error, dur: Duration| {
            warn!("download of {} failed: {err}, retrying in {dur:?}", file.filename);
        })
        .when(Error::is_recoverable)
        .await;

        if result.is_err() {
            let _ = std::fs::remove_file(&partial_path);
        }
        result?;

        std::fs::rename(&partial_path, &final_path).map_err(|source| Error::Io {
            path: final_path.clone(),
            source,
        })?;

        Ok(final_path)
    }

    async fn download_once(
        &self,
        url: &str,
        file: &ReleaseFile,
        partial_path: &Path,
        progress: &dyn ProgressSink,
        cancel: &dyn CancellationToken,
    ) -> Result<()> {
        debug!("downloading {url}");

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

        let total = response.content_length().or(Some(file.size));
        progress.on_start(total);

        let mut out = std::fs::File::create(partial_path).map_err(|source| Error::Io {
            path: partial_path.to_path_buf(),
            source,
        })?;
        let mut hasher = Sha256::new();
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            if cancel.is_cancelled() {
                drop(out);
                let _ = std::fs::remove_file(partial_path);
                return Err(Error::Cancelled);
            }

            let chunk = chunk.map_err(|source| Error::Network {
                url: url.to_string(),
                source,
            })?;

            std::io::Write::write_all(&mut out, &chunk).map_err(|source| Error::Io {
                path: partial_path.to_path_buf(),
                source,
            })?;
            hasher.update(&chunk);
            downloaded += chunk.len() as u64;
            progress.on_progress(downloaded);
        }

        std::io::Write::flush(&mut out).map_err(|source| Error::Io {
            path: partial_path.to_path_buf(),
            source,
        })?;
        drop(out);
        progress.on_finish();

        let actual = format!("{:x}", hasher.finalize());
        if !actual.eq_ignore_ascii_case(&file.sha256) {
            let _ = std::fs::remove_file(partial_path);
            return Err(Error::ChecksumMismatch {
                filename: file.filename.clone(),
                expected: file.sha256.clone(),
                actual,
            });
        }

        if file.size > 0 && downloaded != file.size {
            let _ = std::fs::remove_file(partial_path);
            return Err(Error::ChecksumMismatch {
                filename: file.filename.clone(),
                expected: format!("{} bytes", file.size),
                actual: format!("{downloaded} bytes"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvm_core::model::ArtifactKind;
    use tvm_core::version::Version;

    fn release(os: &str, arch: &str) -> AvailableRelease {
        AvailableRelease {
            version: Version::parse("1.21.0").unwrap(),
            stable: true,
            files: vec![ReleaseFile {
                filename: format!("toolchain-1.21.0-{os}-{arch}.tar.gz"),
                os: os.to_string(),
                arch: arch.to_string(),
                sha256: "deadbeef".to_string(),
                size: 100,
                kind: ArtifactKind::Archive,
            }],
        }
    }

    #[test]
    fn choose_file_matches_os_and_arch() {
        let r = release("linux", "amd64");
        let f = Downloader::choose_file(&r, "linux", "amd64").unwrap();
        assert_eq!(f.filename, "toolchain-1.21.0-linux-amd64.tar.gz");
    }

    #[test]
    fn choose_file_fails_for_missing_platform() {
        let r = release("linux", "amd64");
        let err = Downloader::choose_file(&r, "windows", "amd64").unwrap_err();
        assert!(matches!(err, Error::NoArtifactForPlatform { .. }));
    }
}
