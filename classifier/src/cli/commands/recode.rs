//! Copy a file between compression formats

use anyhow::{Context, Result};
use clap::{Arg, Command, value_parser};
use classifier_core::{Mode, Target, io};
use tracing::info;

use crate::cli::namespace::Namespace;
use crate::cli::plugin::{CommandMetadata, Subcommand};

const DESCRIPTION: &str = "Copy a file, changing its compression

The codec of each side follows its file name: .gz for gzip, .bz2 for bzip2,
anything else is plain text. Use - for stdin or stdout.";

pub struct Recode;

pub fn load() -> Result<Box<dyn Subcommand>> {
    Ok(Box::new(Recode))
}

impl Subcommand for Recode {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata { summary: "Copy a file, changing its compression", description: DESCRIPTION }
    }

    fn build_parser(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("input")
                .value_name("INPUT")
                .required(true)
                .value_parser(value_parser!(Target)),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .required(true)
                .value_parser(value_parser!(Target)),
        )
    }

    fn action(&self, namespace: &Namespace) -> Result<i32> {
        let input = namespace.value::<Target>("input").cloned().unwrap_or(Target::Std);
        let output = namespace.value::<Target>("output").cloned().unwrap_or(Target::Std);

        let read = io::opener(Mode::Read);
        let write = io::opener(Mode::Write);
        let mut reader = read(&input)?.into_input().context("Input stream is not readable")?;
        let mut writer = write(&output)?.into_output().context("Output stream is not writable")?;

        let bytes = std::io::copy(&mut reader, &mut writer)
            .with_context(|| format!("Failed to copy {input} to {output}"))?;
        writer.finish()?;

        info!("copied {bytes} bytes from {input} to {output}");
        Ok(0)
    }
}
