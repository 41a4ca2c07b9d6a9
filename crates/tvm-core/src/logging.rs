//! Global `tracing` subscriber bootstrap, called once from `tvm-cli::main`.
//!
//! Mirrors the teacher's use of `tracing`/`tracing-subscriber` throughout
//! `vx-installer` and `vx-core` — the core crates only ever call
//! `tracing::{debug,info,warn,error}`; wiring a subscriber is the binary's
//! job, not a library's.

use tracing_subscriber::EnvFilter;

/// Install a global subscriber driven by `TVM_LOG` (default: `info`).
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env("TVM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
