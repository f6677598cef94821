//! Two-phase command dispatch
//!
//! Global options are pre-scanned first so logging is ready before any
//! plugin loads. Then the version is resolved, the grammar is built and
//! the full command line is parsed. `help <x>` restarts the cycle as
//! `<x> -h`, so both print exactly the same text.

use anyhow::{Result, anyhow};
use clap::ArgMatches;
use clap::error::ErrorKind;
use classifier_core::{CommandRunner, SystemRunner, VersionResolver};
use tracing::{debug, info};

use super::app::{self, BIN_NAME};
use super::commands;
use super::namespace::Namespace;
use super::registry::{Grammar, HELP, Registry};
use crate::logging;

/// Outcome of parsing one command line
#[derive(Debug)]
pub enum Parsed {
    /// `help <target>`
    Help(String),
    /// A plugin subcommand and its arguments
    Run { name: String, matches: ArgMatches },
}

pub struct Dispatcher<R = SystemRunner> {
    registry: Registry,
    version: VersionResolver<R>,
}

impl Dispatcher<SystemRunner> {
    pub fn new(registry: Registry) -> Self {
        let version = VersionResolver::new(commands::install_dir(), Some(env!("CARGO_PKG_VERSION")));
        Self::with_version(registry, version)
    }
}

impl<R: CommandRunner> Dispatcher<R> {
    pub fn with_version(registry: Registry, version: VersionResolver<R>) -> Self {
        Self { registry, version }
    }

    /// Dispatch `argv` (without the program name); returns the exit code.
    pub fn run(&self, mut argv: Vec<String>) -> Result<i32> {
        loop {
            let globals = match app::prescan(&argv) {
                Ok(globals) => globals,
                Err(e) => return Ok(report(e)),
            };
            logging::init(&globals)?;

            let (grammar, parsed) = match self.resolve(&argv) {
                Ok(resolved) => resolved,
                Err(e) => return Ok(report(e)),
            };

            match parsed {
                Parsed::Help(target) => {
                    debug!("help {target}");
                    argv = help_argv(&target);
                }
                Parsed::Run { name, matches } => {
                    let action = grammar
                        .actions
                        .get(&name)
                        .ok_or_else(|| anyhow!("No handler registered for {name}"))?;
                    let namespace = self.registry.prepare(Namespace::new(globals, name, matches))?;

                    info!("running {} (verbosity {})", namespace.subcommand, namespace.globals.verbosity);
                    return action.action(&namespace);
                }
            }
        }
    }

    /// Resolve the version, build the grammar and parse `argv` with it.
    pub fn resolve(&self, argv: &[String]) -> Result<(Grammar, Parsed), clap::Error> {
        let version = self.version.resolve();
        debug!("{BIN_NAME} {version}");

        let mut grammar = self.registry.discover(app::root(version), argv);
        let parsed = parse(&mut grammar, argv)?;
        Ok((grammar, parsed))
    }
}

/// `help <target>` is answered by `<target> -h`
pub fn help_argv(target: &str) -> Vec<String> {
    vec![target.to_string(), "-h".to_string()]
}

fn parse(grammar: &mut Grammar, argv: &[String]) -> Result<Parsed, clap::Error> {
    let args = std::iter::once(BIN_NAME.to_string()).chain(argv.iter().cloned());
    let matches = grammar.command.try_get_matches_from_mut(args)?;

    match matches.subcommand() {
        Some((HELP, sub)) => {
            let target = sub.get_one::<String>("action").cloned().unwrap_or_default();
            Ok(Parsed::Help(target))
        }
        Some((name, sub)) => Ok(Parsed::Run { name: name.to_string(), matches: sub.clone() }),
        None => Err(grammar.command.error(ErrorKind::MissingSubcommand, "a subcommand is required")),
    }
}

/// Print a clap error (or help/version text) and return its exit code
fn report(err: clap::Error) -> i32 {
    // nothing more useful to do if stdout or stderr is gone
    let _ = err.print();
    err.exit_code()
}
