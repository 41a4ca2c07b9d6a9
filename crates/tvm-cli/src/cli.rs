//! Clap derive command surface.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tvm")]
#[command(about = "Version manager for a compiled-language toolchain")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose diagnostic output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install a toolchain version from the mirror
    Install {
        /// Version to install, e.g. 1.21.0 or go1.21.0
        version: String,
        /// Target OS (defaults to the host OS)
        #[arg(long)]
        os: Option<String>,
        /// Target architecture (defaults to the host architecture)
        #[arg(long)]
        arch: Option<String>,
    },

    /// Remove an installed toolchain version
    Uninstall {
        /// Version to remove
        version: String,
    },

    /// Switch the active toolchain to a version, alias, or 'system'
    Use {
        /// Version, alias, or 'system'/'sys'
        target: String,
    },

    /// List installed toolchain versions
    List,

    /// List versions available from the mirror
    Available,

    /// Show the currently active toolchain version
    Current,

    /// Report the detected system toolchain, if any
    System,

    /// Manage aliases pointing at installed versions
    Alias {
        #[command(subcommand)]
        command: AliasCommand,
    },

    /// Print a shell-init script to be sourced from a shell profile
    Env {
        /// Target shell dialect
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Clone)]
pub enum AliasCommand {
    /// Create or update an alias
    Create {
        name: String,
        version: String,
        /// Overwrite an existing alias of the same name without prompting
        #[arg(long)]
        force: bool,
    },
    /// Remove an alias
    Remove { name: String },
    /// List all aliases
    List,
    /// Export all aliases to a JSON file
    Export { path: std::path::PathBuf },
    /// Import aliases from a JSON file previously produced by `export`
    Import {
        path: std::path::PathBuf,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
