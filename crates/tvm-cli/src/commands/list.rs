use crate::error::CliError;
use crate::ui::UI;
use tvm_core::ports::ProcessEnvironmentProvider;
use tvm_manager::Manager;

pub fn handle(manager: &Manager, cfg: &tvm_config::Configuration, json: bool) -> Result<(), CliError> {
    let env = ProcessEnvironmentProvider;
    let installed = manager.list_installed(cfg, &env)?;

    if json {
        println!("{}", serde_json::to_string(&installed).expect("InstalledVersion always serializes"));
        return Ok(());
    }

    if installed.is_empty() {
        UI::info("no toolchain versions installed");
        return Ok(());
    }

    for entry in installed {
        let marker = if entry.is_active { "*" } else { " " };
        let origin = if entry.is_system { " (system)" } else { "" };
        UI::item(&format!("{marker} {}{}", entry.version.canonical(), origin));
    }
    Ok(())
}
