//! Collaborator traits the core asks its external callers to provide (§6).
//!
//! The core never reaches for `std::env`, a spinner library, or a prompt
//! crate directly — it goes through these ports, so a caller (tests, or the
//! `tvm-cli` front-end) can inject a hermetic or interactive implementation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress reporting sink for long-running downloads/extractions.
pub trait ProgressSink: Send + Sync {
    fn on_start(&self, total_bytes: Option<u64>);
    fn on_progress(&self, current_bytes: u64);
    fn on_finish(&self);
}

/// A sink that does nothing; the default for non-interactive callers and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn on_start(&self, _total_bytes: Option<u64>) {}
    fn on_progress(&self, _current_bytes: u64) {}
    fn on_finish(&self) {}
}

/// Outcome of an interactive confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    Cancel,
}

/// Interactive confirmation, used only by alias create/update under the
/// `interactive` override policy.
pub trait InputPrompter: Send + Sync {
    fn confirm(&self, message: &str) -> Confirmation;
}

/// A prompter that always answers `No`, used whenever no interactive
/// front-end is attached (tests, scripted invocations).
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysDeclinePrompter;

impl InputPrompter for AlwaysDeclinePrompter {
    fn confirm(&self, _message: &str) -> Confirmation {
        Confirmation::No
    }
}

/// A one-shot cancellation signal, polled at every I/O boundary.
pub trait CancellationToken: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

/// A token that never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverCancel;

impl CancellationToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A flag-backed token callers can cancel from another thread (e.g. on
/// Ctrl-C) by cloning the `Arc` and calling `cancel()`.
#[derive(Debug, Clone, Default)]
pub struct FlagCancel(Arc<AtomicBool>);

impl FlagCancel {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl CancellationToken for FlagCancel {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Read-only access to the process environment and platform home directory,
/// injected so tests can supply a hermetic view instead of the real `std::env`.
pub trait EnvironmentProvider: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Production implementation backed by `std::env` and the `dirs` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironmentProvider;

impl EnvironmentProvider for ProcessEnvironmentProvider {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// Test/hermetic implementation backed by an in-memory map.
#[derive(Debug, Default, Clone)]
pub struct MapEnvironmentProvider {
    vars: HashMap<String, String>,
    home: Option<PathBuf>,
}

impl MapEnvironmentProvider {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            home: Some(home.into()),
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvironmentProvider for MapEnvironmentProvider {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_cancel_round_trips() {
        let token = FlagCancel::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn map_environment_provider_returns_configured_values() {
        let env = MapEnvironmentProvider::new("/home/tester").with_var("FOO", "bar");
        assert_eq!(env.var("FOO"), Some("bar".to_string()));
        assert_eq!(env.var("MISSING"), None);
        assert_eq!(env.home_dir(), Some(PathBuf::from("/home/tester")));
    }
}
