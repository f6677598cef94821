//! Subcommand plugin interface
//!
//! Every subcommand contributes its help text, its own arguments and a
//! handler. Plugins are registered by name with a loader so a plugin that
//! cannot initialize is skipped instead of taking the whole CLI down.

use anyhow::Result;
use clap::Command;

use super::namespace::Namespace;

/// Help text for a subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMetadata {
    /// One line, shown in the top-level command listing
    pub summary: &'static str,
    /// Full text, shown at the top of the subcommand's own help
    pub description: &'static str,
}

/// Trait that all subcommands must implement
pub trait Subcommand {
    fn metadata(&self) -> CommandMetadata;

    /// Add subcommand-specific arguments to `cmd`
    fn build_parser(&self, cmd: Command) -> Command;

    /// Run the subcommand; the returned value is the process exit code
    fn action(&self, namespace: &Namespace) -> Result<i32>;
}

/// Builds a plugin instance, failing if the plugin cannot be used
pub type Loader = fn() -> Result<Box<dyn Subcommand>>;

/// A registered subcommand
#[derive(Clone, Copy)]
pub struct PluginEntry {
    pub name: &'static str,
    pub load: Loader,
}

impl PluginEntry {
    pub const fn new(name: &'static str, load: Loader) -> Self {
        Self { name, load }
    }
}
