//! Group alignment rows by a key column

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command, value_parser};
use classifier_core::table::Table;
use classifier_core::{Input, Mode, Output, Target, group_by};
use std::io::{BufReader, Write};
use tracing::info;

use crate::cli::namespace::Namespace;
use crate::cli::plugin::{CommandMetadata, Subcommand};

const SUMMARY: &str = "Group alignment rows by a column";

const DESCRIPTION: &str = "Group alignment rows by a column

Reads a tab-separated alignment table and writes its rows ordered so that
rows sharing a key are adjacent, groups in ascending key order. With
--summary, writes one `key<TAB>count` line per group instead.";

pub struct Group;

pub fn load() -> Result<Box<dyn Subcommand>> {
    Ok(Box::new(Group))
}

impl Subcommand for Group {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata { summary: SUMMARY, description: DESCRIPTION }
    }

    fn build_parser(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("input")
                .value_name("INPUT")
                .value_parser(value_parser!(Target))
                .default_value("-")
                .help("Alignment table, optionally .gz or .bz2 compressed"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("FILE")
                .value_parser(value_parser!(Target))
                .default_value("-")
                .help("Output file"),
        )
        .arg(
            Arg::new("by")
                .long("by")
                .value_name("COLUMN")
                .help("Column to group on [default: from settings, else qseqid]"),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .action(ArgAction::SetTrue)
                .help("Write group sizes instead of rows"),
        )
    }

    fn action(&self, namespace: &Namespace) -> Result<i32> {
        let input = namespace.value::<Target>("input").cloned().unwrap_or(Target::Std);
        let out = namespace.value::<Target>("out").cloned().unwrap_or(Target::Std);
        let by = namespace.value::<String>("by").unwrap_or(&namespace.settings.group.by);

        let reader = Input::open(&input).with_context(|| format!("Failed to open {input}"))?;
        let table = Table::read(BufReader::new(reader), &namespace.settings.columns.rename)
            .with_context(|| format!("Failed to read {input}"))?;
        let key = table.column(by)?;

        let mut output = Output::open(&out, Mode::Write).with_context(|| format!("Failed to create {out}"))?;
        let groups = group_by(table.rows, |row| row[key].clone());

        let mut count = 0;
        if namespace.flag("summary") {
            for (name, rows) in groups {
                writeln!(output, "{name}\t{}", rows.len())?;
                count += 1;
            }
        } else {
            writeln!(output, "{}", table.header.join("\t"))?;
            for (_, rows) in groups {
                for row in rows {
                    writeln!(output, "{}", row.join("\t"))?;
                }
                count += 1;
            }
        }
        output.finish().with_context(|| format!("Failed to write {out}"))?;

        info!("wrote {count} groups by {by} to {out}");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GlobalOptions;
    use classifier_core::Settings;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    const HITS: &str = "qaccver\tsaccver\tpident\n\
                        q2\ts1\t99.1\n\
                        q1\ts3\t97.0\n\
                        q2\ts2\t98.5\n\
                        q1\ts1\t96.2\n";

    fn run(temp_dir: &TempDir, extra: &[&str], settings: Settings) -> Result<String> {
        let input = temp_dir.path().join("hits.tsv");
        let out = temp_dir.path().join("grouped.tsv.gz");
        fs::write(&input, HITS)?;

        let mut argv = vec!["group", input.to_str().unwrap(), "-o", out.to_str().unwrap()];
        argv.extend_from_slice(extra);
        let matches = Group.build_parser(Command::new("group")).try_get_matches_from(argv)?;

        let mut namespace = Namespace::new(GlobalOptions::default(), "group", matches);
        namespace.settings = settings;
        assert_eq!(Group.action(&namespace)?, 0);

        let mut text = String::new();
        Input::open(&Target::from(out.as_path()))?.read_to_string(&mut text)?;
        Ok(text)
    }

    #[test]
    fn test_rows_grouped_by_query() {
        let temp_dir = TempDir::new().unwrap();
        let text = run(&temp_dir, &[], Settings::default()).unwrap();
        assert_eq!(
            text,
            "qseqid\tsseqid\tpident\nq1\ts3\t97.0\nq1\ts1\t96.2\nq2\ts1\t99.1\nq2\ts2\t98.5\n"
        );
    }

    #[test]
    fn test_summary_by_subject() {
        let temp_dir = TempDir::new().unwrap();
        let text = run(&temp_dir, &["--by", "saccver", "--summary"], Settings::default()).unwrap();
        assert_eq!(text, "s1\t2\ns2\t1\ns3\t1\n");
    }

    #[test]
    fn test_key_column_from_settings() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.group.by = "sseqid".to_string();

        let text = run(&temp_dir, &["--summary"], settings).unwrap();
        assert_eq!(text.lines().next(), Some("s1\t2"));
    }

    #[test]
    fn test_unknown_column_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = run(&temp_dir, &["--by", "bitscore"], Settings::default()).unwrap_err();
        assert!(err.to_string().contains("bitscore"));
    }
}
