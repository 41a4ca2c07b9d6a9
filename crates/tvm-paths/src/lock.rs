//! Cross-process exclusive lock at `<root>/state/.lock` (§5), guarding the
//! whole duration of any mutating operation (install, uninstall, use,
//! alias mutate, cleanup). Read-only operations never take it.

use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Holds the process-wide exclusive lock for as long as it is alive;
/// released on drop.
pub struct ProcessLock {
    file: File,
    path: PathBuf,
}

impl ProcessLock {
    /// Block (polling `try_lock_exclusive`) until the lock at `lock_path`
    /// is acquired, or fail `Busy` after 30s.
    pub fn acquire(lock_path: &Path) -> Result<Self> {
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(lock_path)
            .map_err(|source| Error::Io {
                path: lock_path.to_path_buf(),
                source,
            })?;

        let deadline = Instant::now() + ACQUIRE_TIMEOUT;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(Self {
                        file,
                        path: lock_path.to_path_buf(),
                    })
                }
                Err(_) if Instant::now() < deadline => std::thread::sleep(POLL_INTERVAL),
                Err(_) => {
                    return Err(Error::Busy {
                        path: lock_path.to_path_buf(),
                        timeout_secs: ACQUIRE_TIMEOUT.as_secs(),
                    })
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquires_and_releases_lock() {
        let tmp = tempfile::tempdir().unwrap();
        let lock_path = tmp.path().join("state").join(".lock");

        let lock = ProcessLock::acquire(&lock_path).unwrap();
        drop(lock);

        // A second acquisition after drop must succeed immediately.
        let _lock2 = ProcessLock::acquire(&lock_path).unwrap();
    }
}
