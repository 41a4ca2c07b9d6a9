//! Thin command-line front-end: parses arguments, loads configuration,
//! constructs a `Manager`, and renders its results as text or JSON.

pub mod cli;
pub mod commands;
pub mod error;
pub mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use error::CliError;
use tvm_config::Configuration;
use tvm_manager::Manager;
use ui::UI;

/// Entry point delegated to by the `tvm` binary.
pub async fn main() -> anyhow::Result<()> {
    tvm_core::logging::init();

    let cli = Cli::parse();
    UI::set_verbose(cli.verbose);

    let config_path = default_config_path();
    let cfg = match tvm_config::load(&config_path) {
        Ok(cfg) => cfg,
        Err(err) => std::process::exit(error::render(&CliError::Config(err), cli.json)),
    };

    if let Err(err) = run(&cli, &cfg).await {
        std::process::exit(error::render(&err, cli.json));
    }
    Ok(())
}

fn default_config_path() -> std::path::PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("tvm")
        .join("config.json")
}

async fn run(cli: &Cli, cfg: &Configuration) -> Result<(), CliError> {
    let manager = Manager::new(cfg);
    tracing::debug!(install_dir = %cfg.install_dir.display(), "dispatching command");

    match &cli.command {
        Commands::Install { version, os, arch } => {
            commands::install::handle(&manager, cfg, version, os.clone(), arch.clone(), cli.json).await
        }
        Commands::Uninstall { version } => commands::uninstall::handle(&manager, cfg, version, cli.json),
        Commands::Use { target } => commands::use_cmd::handle(&manager, cfg, target, cli.json),
        Commands::List => commands::list::handle(&manager, cfg, cli.json),
        Commands::Available => commands::available::handle(&manager, cli.json).await,
        Commands::Current => commands::current::handle(&manager, cfg, cli.json),
        Commands::System => commands::system::handle(&manager, cli.json),
        Commands::Alias { command } => commands::alias::handle(&manager, command.clone(), cli.json),
        Commands::Env { shell } => commands::env_cmd::handle(cfg, *shell),
    }
}
