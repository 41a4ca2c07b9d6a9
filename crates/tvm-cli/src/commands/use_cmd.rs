use crate::error::CliError;
use crate::ui::UI;
use tvm_core::ports::ProcessEnvironmentProvider;
use tvm_manager::Manager;

pub fn handle(manager: &Manager, cfg: &tvm_config::Configuration, target: &str, json: bool) -> Result<(), CliError> {
    let env = ProcessEnvironmentProvider;
    let (installed, warning) = manager.use_version(cfg, target, &env)?;

    if json {
        println!("{}", serde_json::to_string(&installed).expect("InstalledVersion always serializes"));
    } else {
        UI::success(&format!("now using {}", installed.version.canonical()));
    }

    if let Some(warning) = warning {
        UI::warn(&format!(
            "{} shadows the active-version link at {}",
            warning.shadowing_dir.display(),
            warning.link_dir.display()
        ));
        UI::hint(&warning.remediation);
    }

    Ok(())
}
