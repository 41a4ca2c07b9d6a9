//! Download, verify and extract toolchain releases (§4.C, §4.D).

pub mod downloader;
mod error;
pub mod installer;

pub use downloader::Downloader;
pub use error::{Error, Result};
pub use installer::Installer;
