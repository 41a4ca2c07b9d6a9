use crate::error::CliError;
use crate::ui::UI;
use tvm_core::ports::ProcessEnvironmentProvider;
use tvm_manager::Manager;

pub fn handle(manager: &Manager, json: bool) -> Result<(), CliError> {
    let env = ProcessEnvironmentProvider;
    let system = manager.system_info(&env)?;

    if json {
        println!("{}", serde_json::to_string(&system).expect("SystemToolchain always serializes"));
        return Ok(());
    }

    match system {
        Some(system) => {
            UI::header(&format!("{} ({:?})", system.version.canonical(), system.origin));
            UI::item(&format!("path: {}", system.executable_path.display()));
            UI::item(&format!("runtime_root: {}", system.runtime_root.display()));
            UI::item(&format!("workspace_root: {}", system.workspace_root.display()));
        }
        None => UI::info("no system toolchain detected"),
    }
    Ok(())
}
