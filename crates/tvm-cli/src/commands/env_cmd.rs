//! Shell-init script generation (§6). The core commits only to the
//! semantic per-version env mapping (`tvm-env`); the concrete dialect a
//! user sources from `.bashrc`/`.zshrc`/`config.fish`/`$PROFILE` lives here.

use crate::cli::Shell;
use crate::error::CliError;
use std::path::Path;
use tvm_paths::Layout;

pub fn handle(cfg: &tvm_config::Configuration, shell: Shell) -> Result<(), CliError> {
    let layout = Layout::new(&cfg.install_dir);
    let home = dirs::home_dir();
    let link_dir = tvm_paths::layout::link_dir(home.as_deref()).map_err(tvm_manager::Error::from)?;

    let script = match shell {
        Shell::Bash | Shell::Zsh => render_posix(&link_dir, &layout),
        Shell::Fish => render_fish(&link_dir, &layout),
        Shell::Powershell => render_powershell(&link_dir, &layout),
    };
    println!("{script}");
    Ok(())
}

fn render_posix(link_dir: &Path, layout: &Layout) -> String {
    format!(
        "export PATH=\"{link}:$PATH\"\n\
         __tvm_pointer=\"{pointer}\"\n\
         if [ -f \"$__tvm_pointer\" ]; then\n\
         \t__tvm_active=$(sed -n 's/^active_version=//p' \"$__tvm_pointer\")\n\
         \t__tvm_env_file=\"{scripts}/$__tvm_active.env\"\n\
         \t[ -f \"$__tvm_env_file\" ] && . \"$__tvm_env_file\"\n\
         \tunset __tvm_active __tvm_env_file\n\
         fi\n\
         unset __tvm_pointer\n",
        link = link_dir.display(),
        pointer = layout.active_version_pointer_path().display(),
        scripts = layout.scripts_dir().display(),
    )
}

fn render_fish(link_dir: &Path, layout: &Layout) -> String {
    format!(
        "fish_add_path {link}\n\
         set -l __tvm_pointer \"{pointer}\"\n\
         if test -f $__tvm_pointer\n\
         \tset -l __tvm_active (string match -r 'active_version=(.*)' < $__tvm_pointer)[2]\n\
         \tset -l __tvm_env_file \"{scripts}/$__tvm_active.env\"\n\
         \ttest -f $__tvm_env_file; and source $__tvm_env_file\n\
         end\n",
        link = link_dir.display(),
        pointer = layout.active_version_pointer_path().display(),
        scripts = layout.scripts_dir().display(),
    )
}

fn render_powershell(link_dir: &Path, layout: &Layout) -> String {
    format!(
        "$env:PATH = \"{link};\" + $env:PATH\n\
         $__tvmPointer = \"{pointer}\"\n\
         if (Test-Path $__tvmPointer) {{\n\
         \t$__tvmActive = (Select-String '^active_version=(.*)' $__tvmPointer).Matches[0].Groups[1].Value\n\
         \t$__tvmEnvFile = \"{scripts}\\$__tvmActive.env\"\n\
         \tif (Test-Path $__tvmEnvFile) {{ . $__tvmEnvFile }}\n\
         }}\n",
        link = link_dir.display(),
        pointer = layout.active_version_pointer_path().display(),
        scripts = layout.scripts_dir().display(),
    )
}
