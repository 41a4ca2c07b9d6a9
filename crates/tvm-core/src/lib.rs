//! Shared vocabulary for the toolchain version manager.
//!
//! This crate has no orchestration logic of its own: it owns the canonical
//! version grammar, the data types every other crate passes around, the
//! collaborator traits the core asks its external callers to implement, and
//! a small `logging` bootstrap. Every other `tvm-*` crate depends on this
//! one; this one depends on nothing internal.

pub mod logging;
pub mod model;
pub mod ports;
pub mod reserved;
pub mod toolchain;
pub mod version;

pub use model::{Alias, ArtifactKind, AvailableRelease, InstalledVersion, ReleaseFile, SystemOrigin, SystemToolchain};
pub use version::Version;
