// src/cli.rs

use clap::{Args as ClapArgs, Parser, Subcommand};
use commit_ledger::Complexity;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path inside the git repository to capture from
    #[arg(short, long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Configuration file (defaults to config.toml in the storage directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture a commit (or the staged changes) and record it in history
    Capture(CaptureArgs),

    /// List recent commits, narrowed by the saved filters
    Commits,

    /// Show or change the saved author/task filters
    #[command(subcommand)]
    Filter(FilterCommand),

    /// Browse past captures
    #[command(subcommand)]
    History(HistoryCommand),

    /// Write a report file for a commit or history entry
    Export(ExportArgs),

    /// Print the artifacts of a previously exported report file
    Import {
        /// Report file to read
        file: PathBuf,

        /// Print links instead of the artifact table
        #[arg(long)]
        links: bool,
    },

    /// Hand one artifact's link off to the tracker
    Send {
        /// Artifact path as shown in the report
        path: String,

        #[command(flatten)]
        source: ViewSource,
    },
}

#[derive(ClapArgs, Debug)]
pub struct CaptureArgs {
    /// Revision to capture
    #[arg(default_value = "HEAD", conflicts_with = "staged")]
    pub reference: String,

    /// Capture the staged changes instead of a commit
    #[arg(long)]
    pub staged: bool,

    /// Commit hash to record for a staged capture
    #[arg(long, requires = "staged")]
    pub label: Option<String>,

    /// Narrow the printed view by the saved filters
    #[arg(long)]
    pub filtered: bool,

    /// Print links instead of the artifact table
    #[arg(long)]
    pub links: bool,
}

/// Where the artifact view of a one-shot command comes from
#[derive(ClapArgs, Debug)]
pub struct ViewSource {
    /// Revision to load (not recorded in history)
    #[arg(long, default_value = "HEAD", conflicts_with = "entry")]
    pub reference: String,

    /// History entry to reopen, by id or list index
    #[arg(long)]
    pub entry: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ExportArgs {
    /// Report file to write
    pub file: PathBuf,

    #[command(flatten)]
    pub source: ViewSource,

    /// Drop an artifact from the report before writing
    #[arg(long, value_name = "PATH")]
    pub exclude: Vec<String>,

    /// Override an artifact's complexity, as PATH=LEVEL
    #[arg(long, value_name = "PATH=LEVEL", value_parser = parse_override)]
    pub complexity: Vec<(String, Complexity)>,

    /// Narrow the report by the saved filters
    #[arg(long)]
    pub filtered: bool,
}

#[derive(Subcommand, Debug)]
pub enum FilterCommand {
    /// Print the saved filters
    Show,
    /// Update one or both filters
    Set {
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        task: Option<String>,
    },
    /// Reset both filters
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List past captures, most recent first
    List {
        /// Only entries with artifacts matching the saved filters
        #[arg(long)]
        filtered: bool,
    },
    /// Print one past capture
    Show {
        /// Entry id or list index
        entry: String,

        /// Print links instead of the artifact table
        #[arg(long)]
        links: bool,
    },
}

/// Complexity levels accepted on the command line
#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum Level {
    Low,
    Medium,
    High,
    /// Not applicable
    Na,
}

impl From<Level> for Complexity {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => Complexity::Low,
            Level::Medium => Complexity::Medium,
            Level::High => Complexity::High,
            Level::Na => Complexity::NotApplicable,
        }
    }
}

fn parse_override(value: &str) -> Result<(String, Complexity), String> {
    let (path, level) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATH=LEVEL, got '{}'", value))?;
    let level = <Level as clap::ValueEnum>::from_str(level, true)?;
    Ok((path.to_string(), level.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_are_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn complexity_override_parses() {
        assert_eq!(
            parse_override("src/a b.ts=high").unwrap(),
            ("src/a b.ts".to_string(), Complexity::High)
        );
        assert_eq!(parse_override("logo.png=na").unwrap().1, Complexity::NotApplicable);
        assert!(parse_override("src/a.ts").is_err());
        assert!(parse_override("src/a.ts=huge").is_err());
    }

    #[test]
    fn staged_capture_with_label() {
        let args = Args::parse_from(["commit-ledger", "capture", "--staged", "--label", "abc"]);
        match args.command {
            Command::Capture(capture) => {
                assert!(capture.staged);
                assert_eq!(capture.label.as_deref(), Some("abc"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
