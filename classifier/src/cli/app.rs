use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use classifier_core::Target;

use super::namespace::GlobalOptions;

pub const BIN_NAME: &str = "classifier";

const ABOUT: &str = "Tools for microbial sequence analysis and classification.

Assembles subcommands and provides top-level script.";

/// Logging and verbosity options, recognized anywhere on the command line
fn global_args() -> [Arg; 3] {
    [
        Arg::new("log")
            .short('l')
            .long("log")
            .value_name("FILE")
            .value_parser(value_parser!(Target))
            .default_value("-")
            .help("Send logging to a file"),
        Arg::new("verbosity")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .overrides_with("quiet")
            .help("Increase verbosity of screen output (eg, -v is verbose, -vv more so)"),
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .overrides_with("verbosity")
            .help("Suppress output"),
    ]
}

/// Top-level command without subcommands
pub fn root(version: String) -> Command {
    Command::new(BIN_NAME)
        .about(ABOUT)
        .version(version)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(global_args().map(|arg| arg.global(true)))
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .action(ArgAction::Version)
                .help("Print the version number and exit"),
        )
}

/// Parse only the global options, ignoring everything else in `argv`.
pub fn prescan(argv: &[String]) -> Result<GlobalOptions, clap::Error> {
    let matches = Command::new(BIN_NAME)
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args(global_args())
        .try_get_matches_from(global_tokens(argv))?;

    Ok(globals_from(&matches))
}

fn globals_from(matches: &ArgMatches) -> GlobalOptions {
    GlobalOptions {
        log: matches.get_one::<Target>("log").cloned().unwrap_or(Target::Std),
        // a later -q removes earlier -v counts and vice versa
        verbosity: matches.get_count("verbosity"),
    }
}

/// Tokens of `argv` that belong to global options, in order.
fn global_tokens(argv: &[String]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut args = argv.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--" => break,
            "--log" => {
                tokens.push(arg.clone());
                tokens.extend(args.next().cloned());
            }
            "--verbose" | "--quiet" => tokens.push(arg.clone()),
            s if s.starts_with("--log=") => tokens.push(arg.clone()),
            s if s.starts_with("--") => {}
            s => {
                let Some((cluster, needs_value)) = short_cluster(s) else { continue };
                tokens.push(cluster);
                if needs_value {
                    tokens.extend(args.next().cloned());
                }
            }
        }
    }
    tokens
}

/// Global part of a short-flag cluster such as `-vv`, `-vq`, `-vl`, `-vlrun.log`
///
/// Leading `v`/`q` flags are kept. An `l` after them takes the rest of the
/// token as its value, or the next token when nothing follows it (flagged by
/// the returned bool). Any other flag ends the global part.
fn short_cluster(arg: &str) -> Option<(String, bool)> {
    let flags = arg.strip_prefix('-')?;
    let switches = flags.find(|c| c != 'v' && c != 'q').unwrap_or(flags.len());
    let rest = &flags[switches..];

    if rest.starts_with('l') {
        Some((format!("-{flags}"), rest == "l"))
    } else if switches > 0 {
        Some((format!("-{}", &flags[..switches]), false))
    } else {
        None
    }
}
