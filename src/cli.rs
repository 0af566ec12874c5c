use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::config;
use crate::commands;
use crate::commands::{close_range, labels, lint, sync, CommandReport};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (build ", env!("BUILD_UUID"), ")");

#[derive(Parser)]
#[command(
    name = "issuesync",
    version = VERSION,
    about = "Keep a markdown issue catalog in sync with a repository's issue list"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse the catalog, diff it against the remote issues, create what is missing
    Sync {
        /// Repository as OWNER/REPO; auto-detected when omitted
        repo: Option<String>,
        /// Catalog document to read
        #[arg(long, default_value = "ISSUES.md")]
        file: PathBuf,
        /// Print the plan without creating anything
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Close a contiguous range of remote issue ids with a comment
    CloseRange {
        /// First issue id to close
        start: u64,
        /// Last issue id to close (inclusive)
        end: u64,
        /// Repository as OWNER/REPO; auto-detected when omitted
        repo: Option<String>,
        /// Comment attached to every closed issue
        #[arg(long)]
        comment: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Create the standard label catalog on the repository
    Labels {
        /// Repository as OWNER/REPO; auto-detected when omitted
        repo: Option<String>,
    },
    /// Parse the catalog locally and report records and warnings
    Lint {
        /// Catalog document to read
        #[arg(long, default_value = "ISSUES.md")]
        file: PathBuf,
        /// Emit records and warnings as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    let report = match cli.command {
        Command::Sync {
            repo,
            file,
            dry_run,
            yes,
        } => {
            let opts = sync::SyncCommandOptions {
                repo,
                file,
                dry_run,
            };
            let mut confirm = commands::confirmer(yes);
            sync::run(&opts, &cfg, confirm.as_mut())?
        }
        Command::CloseRange {
            start,
            end,
            repo,
            comment,
            yes,
        } => {
            let opts = close_range::CloseRangeOptions {
                repo,
                start,
                end,
                comment,
            };
            let mut confirm = commands::confirmer(yes);
            close_range::run(&opts, confirm.as_mut())?
        }
        Command::Labels { repo } => labels::run(&labels::LabelsOptions { repo })?,
        Command::Lint { file, json } => lint::run(&lint::LintOptions { file, json }, &cfg)?,
    };

    print_report(&report);
    if !report.ok {
        anyhow::bail!("{} completed with issues", report.command);
    }
    Ok(())
}

fn print_report(report: &CommandReport) {
    for detail in &report.details {
        println!("{detail}");
    }
    for issue in &report.issues {
        eprintln!("error: {issue}");
    }
}
