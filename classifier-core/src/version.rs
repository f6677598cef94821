//! Best-effort version resolution
//!
//! Tries `git describe` against the install directory, then the package
//! version recorded at build time, then `0.0.0`. Never fails.

use anyhow::{Context, Result, bail};
use regex_utils::describe;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Version reported when nothing better is known
pub const FALLBACK_VERSION: &str = "0.0.0";

/// Runs an external program and captures its standard output
pub trait CommandRunner {
    fn capture(&self, program: &str, args: &[String]) -> Result<String>;
}

/// Spawns real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn capture(&self, program: &str, args: &[String]) -> Result<String> {
        let output = Command::new(program)
            .args(args)
            .stderr(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute {program}"))?;

        if !output.status.success() {
            bail!("{program} exited with {}", output.status);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub struct VersionResolver<R = SystemRunner> {
    install_dir: Option<PathBuf>,
    package_version: Option<String>,
    runner: R,
}

impl VersionResolver<SystemRunner> {
    pub fn new(install_dir: Option<PathBuf>, package_version: Option<&str>) -> Self {
        Self::with_runner(install_dir, package_version, SystemRunner)
    }
}

impl<R: CommandRunner> VersionResolver<R> {
    pub fn with_runner(install_dir: Option<PathBuf>, package_version: Option<&str>, runner: R) -> Self {
        Self {
            install_dir,
            package_version: package_version.filter(|v| !v.is_empty()).map(str::to_string),
            runner,
        }
    }

    /// Resolve a version string; failures are logged and skipped.
    pub fn resolve(&self) -> String {
        if let Some(version) = self.from_git() {
            return version;
        }

        match &self.package_version {
            Some(version) => version.clone(),
            None => {
                warn!("No package version recorded; reporting {FALLBACK_VERSION}");
                FALLBACK_VERSION.to_string()
            }
        }
    }

    fn from_git(&self) -> Option<String> {
        self.describe_commands().iter().find_map(|args| {
            debug!("git {}", args.join(" "));
            match self.runner.capture("git", args) {
                Ok(output) => {
                    let version = format_describe(&output);
                    if version.is_none() {
                        debug!("Unrecognized git describe output: {:?}", output.trim());
                    }
                    version
                }
                Err(e) => {
                    debug!("{e:#}");
                    None
                }
            }
        })
    }

    fn describe_commands(&self) -> Vec<Vec<String>> {
        let describe = vec!["describe".to_string(), "--tags".to_string()];
        let mut commands = Vec::new();
        // `-C` needs git >= 1.8.5
        if let Some(dir) = &self.install_dir {
            let mut rooted = vec!["-C".to_string(), dir.display().to_string()];
            rooted.extend(describe.iter().cloned());
            commands.push(rooted);
        }
        commands.push(describe);
        commands
    }
}

/// `v0.1.2-38-g6a8e5e3` becomes `0.1.2.dev38`; `v0.1.2` stays `0.1.2`.
pub fn format_describe(output: &str) -> Option<String> {
    let parsed = describe::parse(output)?;
    if parsed.commits.is_empty() {
        Some(parsed.tag)
    } else {
        Some(format!("{}.dev{}", parsed.tag, parsed.commits))
    }
}
