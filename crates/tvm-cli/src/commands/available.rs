use crate::error::CliError;
use crate::ui::UI;
use tvm_manager::Manager;

pub async fn handle(manager: &Manager, json: bool) -> Result<(), CliError> {
    let releases = manager.list_available().await?;

    if json {
        println!("{}", serde_json::to_string(&releases).expect("AvailableRelease always serializes"));
        return Ok(());
    }

    for release in releases {
        let stability = if release.stable { "" } else { " (prerelease)" };
        UI::item(&format!("{}{}", release.version.canonical(), stability));
    }
    Ok(())
}
