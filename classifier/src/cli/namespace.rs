use classifier_core::{Settings, Target};
use clap::ArgMatches;
use std::any::Any;

/// Global options, known before any subcommand grammar exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Logging destination
    pub log: Target,
    pub verbosity: u8,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self { log: Target::Std, verbosity: 0 }
    }
}

/// Fully resolved configuration handed to a subcommand
#[derive(Debug, Clone)]
pub struct Namespace {
    pub globals: GlobalOptions,
    /// Name of the chosen subcommand
    pub subcommand: String,
    /// Values of the subcommand's own and common arguments
    pub matches: ArgMatches,
    /// Filled in by the post-processing hook
    pub settings: Settings,
}

impl Namespace {
    pub fn new(globals: GlobalOptions, subcommand: impl Into<String>, matches: ArgMatches) -> Self {
        Self { globals, subcommand: subcommand.into(), matches, settings: Settings::default() }
    }

    /// Typed value of a subcommand argument
    pub fn value<T: Any + Clone + Send + Sync + 'static>(&self, id: &str) -> Option<&T> {
        self.matches.get_one::<T>(id)
    }

    pub fn flag(&self, id: &str) -> bool {
        self.matches.get_flag(id)
    }
}
