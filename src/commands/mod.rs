pub mod close_range;
pub mod labels;
pub mod lint;
pub mod sync;

use anyhow::{anyhow, Context, Result};
use std::io::{self, Write};

use crate::gh::IssueTracker;

#[derive(Debug, Clone)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

pub fn ensure_gh_available(report: &mut CommandReport) -> bool {
    if crate::gh::gh_available() {
        return true;
    }

    report.issue("gh binary unavailable; set ISSUESYNC_GH_BIN or ensure gh is on PATH");
    false
}

/// An explicit repository argument wins; otherwise ask the tracker.
/// Unresolvable is fatal, before any remote mutation.
pub fn resolve_repo(tracker: &dyn IssueTracker, arg: Option<&str>) -> Result<String> {
    if let Some(repo) = arg {
        return Ok(repo.to_string());
    }
    tracker.detect_repo().map_err(|err| {
        anyhow!("could not detect the repository ({err}); pass OWNER/REPO as an argument")
    })
}

/// Injected yes/no capability so commands are testable without a
/// terminal.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        print!("{prompt} (y/N): ");
        io::stdout().flush().context("failed to flush stdout")?;
        let mut line = String::new();
        io::stdin()
            .read_line(&mut line)
            .context("failed to read confirmation")?;
        Ok(line.trim().eq_ignore_ascii_case("y"))
    }
}

pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

pub fn confirmer(assume_yes: bool) -> Box<dyn Confirm> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    }
}
