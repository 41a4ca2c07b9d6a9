//! Wire-format mirrors of the mirror's JSON payload (§6). Kept separate
//! from `tvm_core::AvailableRelease` so a parse failure on one field (an
//! unparseable version string) doesn't take the whole decode down.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CatalogEntryWire {
    pub version: String,
    pub stable: bool,
    pub files: Vec<ReleaseFileWire>,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseFileWire {
    pub filename: String,
    pub os: String,
    pub arch: String,
    pub sha256: String,
    pub size: u64,
    pub kind: String,
}
