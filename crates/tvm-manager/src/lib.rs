//! Component F — Runtime Manager (§4.F): orchestrates Configuration,
//! Catalog, Installer, System Detector and Paths behind one process-wide
//! lock, and owns the active-version pointer and alias store.

pub mod alias;
mod error;
pub mod manager;
pub mod pointer;

pub use alias::{AliasStore, OverridePolicy};
pub use error::{Error, PathOrderWarning, Result};
pub use manager::Manager;
pub use pointer::PointerState;
