//! Subcommand registry
//!
//! Holds the registered plugins and assembles the command-line grammar for
//! one invocation. Only the plugins named on the command line are loaded
//! when any are; otherwise all of them are, for the top-level help listing.

use anyhow::Result;
use clap::{Arg, Command};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, error};

use super::namespace::Namespace;
use super::plugin::{PluginEntry, Subcommand};

/// Name of the pseudo-subcommand that shows another subcommand's help
pub const HELP: &str = "help";

/// Layout of a subcommand's own help: full description, then usage
const SUBCOMMAND_TEMPLATE: &str = "{before-help}{usage-heading} {usage}\n\n{all-args}{after-help}";

/// Adds the options every subcommand accepts
pub type CommonOptions = fn(Command) -> Command;

/// Post-processes the namespace before any handler runs
pub type Prepare = fn(Namespace) -> Result<Namespace>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Subcommand already registered: {0}")]
    Duplicate(String),

    #[error("Subcommand name is reserved: {0}")]
    Reserved(String),
}

pub struct Registry {
    entries: Vec<PluginEntry>,
    common: CommonOptions,
    prepare: Prepare,
}

/// Grammar and handlers for one invocation
pub struct Grammar {
    pub command: Command,
    pub actions: BTreeMap<String, Box<dyn Subcommand>>,
}

impl Registry {
    pub fn new(common: CommonOptions, prepare: Prepare) -> Self {
        Self { entries: Vec::new(), common, prepare }
    }

    /// Register a plugin; names must be unique.
    pub fn register(&mut self, entry: PluginEntry) -> Result<(), RegistryError> {
        if entry.name == HELP {
            return Err(RegistryError::Reserved(entry.name.to_string()));
        }
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(RegistryError::Duplicate(entry.name.to_string()));
        }
        self.entries.push(entry);
        Ok(())
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Add the help pseudo-subcommand and the plugins relevant to `argv`
    /// to `root`. Plugins that fail to load are logged and left out.
    pub fn discover(&self, root: Command, argv: &[String]) -> Grammar {
        let named: Vec<&PluginEntry> =
            self.entries.iter().filter(|e| argv.iter().any(|a| a == e.name)).collect();
        let considered = if named.is_empty() { self.entries.iter().collect() } else { named };

        let mut command = root.subcommand(help_command());
        let mut actions = BTreeMap::new();

        for entry in considered {
            let plugin = match (entry.load)() {
                Ok(plugin) => plugin,
                Err(e) => {
                    error!("{}: {e:#}", entry.name);
                    continue;
                }
            };

            let metadata = plugin.metadata();
            let subcommand = Command::new(entry.name)
                .about(metadata.summary)
                .before_help(metadata.description)
                .help_template(SUBCOMMAND_TEMPLATE);
            let subcommand = (self.common)(plugin.build_parser(subcommand));

            debug!("registered subcommand {}", entry.name);
            command = command.subcommand(subcommand);
            actions.insert(entry.name.to_string(), plugin);
        }

        Grammar { command, actions }
    }

    /// Run the post-processing hook.
    pub fn prepare(&self, namespace: Namespace) -> Result<Namespace> {
        (self.prepare)(namespace)
    }
}

fn help_command() -> Command {
    Command::new(HELP)
        .about("Detailed help for actions using `help <action>`")
        .arg(Arg::new("action").required(true).num_args(1))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cli::app;
    use crate::cli::plugin::CommandMetadata;
    use crate::logging::capture::SharedBuffer;
    use anyhow::bail;
    use clap::ArgAction;

    /// Test plugin that reports whether its flag was given
    struct Fake;

    impl Subcommand for Fake {
        fn metadata(&self) -> CommandMetadata {
            CommandMetadata { summary: "Fake summary", description: "Fake summary\n\nLonger fake description." }
        }

        fn build_parser(&self, cmd: Command) -> Command {
            cmd.arg(Arg::new("flag").long("flag").action(ArgAction::SetTrue).help("A fake flag"))
        }

        fn action(&self, namespace: &Namespace) -> Result<i32> {
            Ok(if namespace.flag("flag") { 1 } else { 0 })
        }
    }

    fn load_alpha() -> Result<Box<dyn Subcommand>> {
        Ok(Box::new(Fake))
    }

    fn load_beta() -> Result<Box<dyn Subcommand>> {
        Ok(Box::new(Fake))
    }

    fn load_broken() -> Result<Box<dyn Subcommand>> {
        bail!("reference data missing")
    }

    fn no_common(cmd: Command) -> Command {
        cmd
    }

    fn no_prepare(namespace: Namespace) -> Result<Namespace> {
        Ok(namespace)
    }

    pub(crate) fn fake_registry() -> Registry {
        let mut registry = Registry::new(no_common, no_prepare);
        registry.register(PluginEntry::new("alpha", load_alpha)).unwrap();
        registry.register(PluginEntry::new("broken", load_broken)).unwrap();
        registry.register(PluginEntry::new("beta", load_beta)).unwrap();
        registry
    }

    fn discover_logged(registry: &Registry, argv: &[&str]) -> (Grammar, String) {
        let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        let grammar = tracing::subscriber::with_default(subscriber, || {
            registry.discover(app::root("0.0.0".to_string()), &argv)
        });
        (grammar, buffer.contents())
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut registry = fake_registry();
        let err = registry.register(PluginEntry::new("alpha", load_beta)).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(name) if name == "alpha"));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["alpha", "broken", "beta"]);
    }

    #[test]
    fn test_help_name_is_reserved() {
        let mut registry = fake_registry();
        let err = registry.register(PluginEntry::new(HELP, load_alpha)).unwrap_err();
        assert!(matches!(err, RegistryError::Reserved(_)));
    }

    #[test]
    fn test_broken_plugin_is_isolated() {
        let registry = fake_registry();
        let (grammar, logs) = discover_logged(&registry, &[]);

        assert_eq!(grammar.actions.keys().collect::<Vec<_>>(), ["alpha", "beta"]);
        let errors: Vec<&str> = logs.lines().filter(|line| line.contains("ERROR")).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("broken: reference data missing"));

        let mut command = grammar.command;
        let matches = command.try_get_matches_from_mut(["classifier", "beta", "--flag"]).unwrap();
        assert_eq!(matches.subcommand_name(), Some("beta"));
    }

    #[test]
    fn test_named_plugins_only() {
        let registry = fake_registry();
        let (grammar, logs) = discover_logged(&registry, &["beta", "--flag"]);

        assert_eq!(grammar.actions.keys().collect::<Vec<_>>(), ["beta"]);
        assert!(!logs.contains("ERROR"));
        let names: Vec<&str> = grammar.command.get_subcommands().map(|c| c.get_name()).collect();
        assert_eq!(names, [HELP, "beta"]);
    }

    #[test]
    fn test_grammar_is_consistent() {
        let registry = fake_registry();
        let (grammar, _) = discover_logged(&registry, &[]);
        grammar.command.debug_assert();
    }
}
