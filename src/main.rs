//! Version manager for a compiled-language toolchain.
//!
//! Main binary entry point that delegates to the CLI implementation.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tvm_cli::main().await
}
