use anyhow::Result;

use crate::commands::{ensure_gh_available, resolve_repo, CommandReport};
use crate::gh::{GhCli, IssueTracker, LabelOutcome, LabelSpec};

/// The standard label catalog the issue documents draw from.
pub const LABEL_CATALOG: &[LabelSpec] = &[
    LabelSpec { name: "enhancement", color: "a2eeef", description: "New feature or improvement" },
    LabelSpec { name: "feature", color: "0e8a16", description: "New feature" },
    LabelSpec { name: "bug", color: "d73a4a", description: "Something is not working" },
    LabelSpec { name: "documentation", color: "0075ca", description: "Documentation improvement" },
    LabelSpec { name: "testing", color: "bfe5bf", description: "Tests" },
    LabelSpec { name: "security", color: "ee0701", description: "Security" },
    LabelSpec { name: "performance", color: "fbca04", description: "Performance" },
    LabelSpec { name: "ux", color: "c5def5", description: "User experience" },
    LabelSpec { name: "i18n", color: "bfd4f2", description: "Internationalization" },
    LabelSpec { name: "technical", color: "7057ff", description: "Technical improvement" },
    LabelSpec { name: "refactoring", color: "e4e669", description: "Refactoring" },
    LabelSpec { name: "maintenance", color: "ffffff", description: "Maintenance" },
    LabelSpec { name: "priority:high", color: "b60205", description: "High priority" },
    LabelSpec { name: "priority:medium", color: "fbca04", description: "Medium priority" },
    LabelSpec { name: "priority:low", color: "0e8a16", description: "Low priority" },
];

#[derive(Debug, Clone)]
pub struct LabelsOptions {
    pub repo: Option<String>,
}

pub fn run(opts: &LabelsOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("labels");

    if !ensure_gh_available(&mut report) {
        return Ok(report);
    }
    let tracker = GhCli::resolve()?;
    let repo = resolve_repo(&tracker, opts.repo.as_deref())?;
    report.detail(format!("repository: {repo}"));

    let mut ok = 0usize;
    for label in LABEL_CATALOG {
        match tracker.create_label(&repo, label) {
            Ok(LabelOutcome::Created) => {
                ok += 1;
                println!("  created label '{}'", label.name);
            }
            Ok(LabelOutcome::AlreadyExists) => {
                ok += 1;
                println!("  label '{}' already exists", label.name);
            }
            Err(err) => {
                report.issue(format!("label '{}' failed: {err}", label.name));
            }
        }
    }
    report.detail(format!("{ok}/{} labels in place", LABEL_CATALOG.len()));

    Ok(report)
}
