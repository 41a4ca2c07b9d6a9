use crate::error::CliError;
use crate::ui::{IndicatifProgressSink, UI};
use tvm_core::ports::NeverCancel;
use tvm_core::version::Version;
use tvm_manager::Manager;

pub async fn handle(
    manager: &Manager,
    cfg: &tvm_config::Configuration,
    version: &str,
    os: Option<String>,
    arch: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let version = Version::parse(version)
        .map_err(|e| CliError::Manager(tvm_manager::Error::InvalidArgument(e.to_string())))?;
    let os = os.unwrap_or_else(|| std::env::consts::OS.to_string());
    let arch = arch.unwrap_or_else(|| std::env::consts::ARCH.to_string());

    let progress = IndicatifProgressSink::new(format!("downloading {}", version.canonical()));
    let installed = manager
        .install(cfg, &version, &os, &arch, &progress, &NeverCancel)
        .await?;

    if json {
        println!("{}", serde_json::to_string(&installed).expect("InstalledVersion always serializes"));
    } else {
        UI::success(&format!("installed {}", installed.version.canonical()));
    }
    Ok(())
}
