use crate::cli::AliasCommand;
use crate::error::CliError;
use crate::ui::UI;
use tvm_core::ports::AlwaysDeclinePrompter;
use tvm_core::version::Version;
use tvm_manager::{Manager, OverridePolicy};

pub fn handle(manager: &Manager, command: AliasCommand, json: bool) -> Result<(), CliError> {
    match command {
        AliasCommand::Create { name, version, force } => {
            let version = Version::parse(&version)
                .map_err(|e| CliError::Manager(tvm_manager::Error::InvalidArgument(e.to_string())))?;
            let policy = if force { OverridePolicy::Force } else { OverridePolicy::NoOverride };
            manager.create_alias(&name, &version, policy, &AlwaysDeclinePrompter)?;
            if !json {
                UI::success(&format!("alias '{name}' -> {}", version.canonical()));
            }
        }
        AliasCommand::Remove { name } => {
            manager.remove_alias(&name)?;
            if !json {
                UI::success(&format!("removed alias '{name}'"));
            }
        }
        AliasCommand::List => {
            let aliases = manager.list_aliases()?;
            if json {
                println!("{}", serde_json::to_string(&aliases).expect("Alias always serializes"));
            } else if aliases.is_empty() {
                UI::info("no aliases defined");
            } else {
                for alias in aliases {
                    UI::item(&format!("{} -> {}", alias.name, alias.version.canonical()));
                }
            }
        }
        AliasCommand::Export { path } => {
            manager.export_aliases(&path)?;
            if !json {
                UI::success(&format!("exported aliases to {}", path.display()));
            }
        }
        AliasCommand::Import { path, force } => {
            let policy = if force { OverridePolicy::Force } else { OverridePolicy::NoOverride };
            manager.import_aliases(&path, policy, &AlwaysDeclinePrompter)?;
            if !json {
                UI::success(&format!("imported aliases from {}", path.display()));
            }
        }
    }
    Ok(())
}
