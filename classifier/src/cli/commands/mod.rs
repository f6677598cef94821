use anyhow::{Context, Result};
use clap::{Arg, Command, value_parser};
use classifier_core::Settings;
use classifier_core::config::SETTINGS_FILE;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::namespace::Namespace;
use super::plugin::PluginEntry;
use super::registry::Registry;

pub mod group;
pub mod recode;

/// Every subcommand the `classifier` binary knows about
const PLUGINS: &[PluginEntry] = &[
    PluginEntry::new("group", group::load),
    PluginEntry::new("recode", recode::load),
];

pub fn registry() -> Result<Registry> {
    let mut registry = Registry::new(common_options, prepare);
    for entry in PLUGINS {
        registry.register(*entry)?;
    }
    Ok(registry)
}

/// Directory containing the running executable
pub fn install_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// Reference data shipped next to the executable
pub fn data_dir() -> PathBuf {
    install_dir().unwrap_or_default().join("data")
}

fn common_options(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("data_dir")
            .long("data-dir")
            .value_name("DIR")
            .value_parser(value_parser!(PathBuf))
            .default_value(data_dir().display().to_string())
            .help("Directory with reference data and settings"),
    )
    .arg(
        Arg::new("config")
            .long("config")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help(format!("Settings file [default: <data-dir>/{SETTINGS_FILE} if present]")),
    )
}

fn prepare(mut namespace: Namespace) -> Result<Namespace> {
    namespace.settings = match namespace.value::<PathBuf>("config") {
        Some(path) => Settings::load(path)?,
        None => {
            let data_dir = namespace.value::<PathBuf>("data_dir").cloned().unwrap_or_else(data_dir);
            Settings::load_or_default(&data_dir.join(SETTINGS_FILE))
                .context("Failed to load default settings")?
        }
    };
    debug!("settings: {:?}", namespace.settings);
    Ok(namespace)
}
