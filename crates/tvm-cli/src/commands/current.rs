use crate::error::CliError;
use crate::ui::UI;
use tvm_core::ports::ProcessEnvironmentProvider;
use tvm_manager::Manager;

pub fn handle(manager: &Manager, cfg: &tvm_config::Configuration, json: bool) -> Result<(), CliError> {
    let env = ProcessEnvironmentProvider;
    let current = manager.current(cfg, &env)?;

    if json {
        println!("{}", serde_json::to_string(&current).expect("InstalledVersion always serializes"));
        return Ok(());
    }

    let origin = if current.is_system { " (system)" } else { "" };
    UI::header(&format!("{}{}", current.version.canonical(), origin));
    UI::item(&format!("path: {}", current.path.display()));
    Ok(())
}
