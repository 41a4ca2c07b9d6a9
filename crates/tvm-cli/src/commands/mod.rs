pub mod alias;
pub mod available;
pub mod current;
pub mod env_cmd;
pub mod install;
pub mod list;
pub mod system;
pub mod uninstall;
pub mod use_cmd;
