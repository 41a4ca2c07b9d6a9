use crate::error::CliError;
use crate::ui::UI;
use tvm_core::version::Version;
use tvm_manager::Manager;

pub fn handle(
    manager: &Manager,
    cfg: &tvm_config::Configuration,
    version: &str,
    json: bool,
) -> Result<(), CliError> {
    let version = Version::parse(version)
        .map_err(|e| CliError::Manager(tvm_manager::Error::InvalidArgument(e.to_string())))?;
    manager.uninstall(cfg, &version)?;

    if json {
        println!("{}", serde_json::json!({ "uninstalled": version.canonical() }));
    } else {
        UI::success(&format!("uninstalled {}", version.canonical()));
    }
    Ok(())
}
