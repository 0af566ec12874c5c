use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::config::SyncConfig;
use crate::catalog::parser::parse_document;
use crate::catalog::record::{sort_by_number, IssueRecord};
use crate::catalog::reconcile::{build_index, reconcile};
use crate::catalog::sync::{synchronize, SyncObserver};
use crate::commands::{ensure_gh_available, resolve_repo, CommandReport, Confirm};
use crate::error::TrackerError;
use crate::gh::{GhCli, IssueTracker};

const PREVIEW_LINES: usize = 5;
const TITLE_DISPLAY_CHARS: usize = 60;

#[derive(Debug, Clone)]
pub struct SyncCommandOptions {
    pub repo: Option<String>,
    pub file: PathBuf,
    pub dry_run: bool,
}

pub fn run(
    opts: &SyncCommandOptions,
    cfg: &SyncConfig,
    confirm: &mut dyn Confirm,
) -> Result<CommandReport> {
    let mut report = CommandReport::new("sync");

    if !ensure_gh_available(&mut report) {
        return Ok(report);
    }
    let tracker = GhCli::resolve()?;
    let repo = resolve_repo(&tracker, opts.repo.as_deref())?;
    report.detail(format!("repository: {repo}"));

    let text = fs::read_to_string(&opts.file)
        .with_context(|| format!("failed to read {}", opts.file.display()))?;
    let (records, warnings) = parse_document(&text, &cfg.parser_options());
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }
    report.detail(format!(
        "parsed {} records from {}",
        records.len(),
        opts.file.display()
    ));

    // A listing failure is fatal: an empty snapshot would mark the
    // whole catalog as missing and recreate it.
    let remote = tracker
        .list_issues(&repo, cfg.remote.list_limit)
        .map_err(|err| anyhow!("failed to list issues on {repo}: {err}"))?;
    let index = build_index(&remote);
    report.detail(format!("{} issues already on the remote", index.len()));

    let reconciliation = reconcile(&records, &index);
    for (record, remote_id) in &reconciliation.present {
        println!(
            "  exists: #{} '{}' (remote #{remote_id})",
            record.number,
            truncate_title(&record.title)
        );
    }

    let mut missing = reconciliation.missing;
    sort_by_number(&mut missing);
    if missing.is_empty() {
        report.detail("all records already exist remotely".to_string());
        return Ok(report);
    }

    println!("{} records to create:", missing.len());
    for record in missing.iter().take(PREVIEW_LINES) {
        println!("  #{}: {}", record.number, truncate_title(&record.title));
    }
    if missing.len() > PREVIEW_LINES {
        println!("  ... and {} more", missing.len() - PREVIEW_LINES);
    }

    if opts.dry_run {
        report.detail(format!(
            "dry-run: {} creations planned, nothing sent",
            missing.len()
        ));
        return Ok(report);
    }

    if !confirm.confirm(&format!(
        "Create {} missing issues on {repo}?",
        missing.len()
    ))? {
        report.detail("cancelled".to_string());
        return Ok(report);
    }

    let outcome = synchronize(
        &tracker,
        &repo,
        &missing,
        &cfg.sync_options(),
        &mut ConsoleObserver,
    );

    for created in &outcome.created {
        report.detail(format!(
            "created #{} '{}': {}",
            created.number, created.title, created.url
        ));
    }
    for failed in &outcome.failed {
        report.issue(format!(
            "issue #{} '{}' failed: {}",
            failed.number, failed.title, failed.error
        ));
    }
    report.detail(format!(
        "{} created, {} failed",
        outcome.created.len(),
        outcome.failed.len()
    ));

    Ok(report)
}

/// Prints the per-record progress lines while the engine runs.
struct ConsoleObserver;

impl SyncObserver for ConsoleObserver {
    fn creating(&mut self, record: &IssueRecord, position: usize, total: usize) {
        println!(
            "[{position}/{total}] creating #{}: {}",
            record.number,
            truncate_title(&record.title)
        );
    }

    fn created(&mut self, _record: &IssueRecord, url: &str) {
        println!("  created: {url}");
    }

    fn failed(&mut self, _record: &IssueRecord, error: &TrackerError) {
        println!("  failed: {error}");
    }

    fn retrying_without_labels(&mut self, _record: &IssueRecord) {
        println!("  labels rejected, retrying without labels");
    }

    fn label_attach_failed(&mut self, record: &IssueRecord, label: &str, error: &TrackerError) {
        eprintln!(
            "warning: could not attach label '{label}' to issue #{}: {error}",
            record.number
        );
    }

    fn backing_off(&mut self, _record: &IssueRecord, attempt: u32, delay: Duration) {
        println!(
            "  rate limited, retry {attempt} in {}ms",
            delay.as_millis()
        );
    }
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_DISPLAY_CHARS {
        let mut out: String = title.chars().take(TITLE_DISPLAY_CHARS).collect();
        out.push_str("...");
        out
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_title;

    #[test]
    fn short_titles_pass_through() {
        assert_eq!(truncate_title("Fix login"), "Fix login");
    }

    #[test]
    fn long_titles_are_cut_at_sixty_chars() {
        let long = "x".repeat(80);
        let cut = truncate_title(&long);
        assert_eq!(cut.chars().count(), 63);
        assert!(cut.ends_with("..."));
    }
}
