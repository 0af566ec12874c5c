use anyhow::Result;

use crate::catalog::close::{close_range, DEFAULT_CLOSE_COMMENT};
use crate::commands::{ensure_gh_available, resolve_repo, CommandReport, Confirm};
use crate::gh::GhCli;

#[derive(Debug, Clone)]
pub struct CloseRangeOptions {
    pub repo: Option<String>,
    pub start: u64,
    pub end: u64,
    pub comment: Option<String>,
}

pub fn run(opts: &CloseRangeOptions, confirm: &mut dyn Confirm) -> Result<CommandReport> {
    let mut report = CommandReport::new("close-range");

    if opts.start == 0 {
        anyhow::bail!("issue ids start at 1");
    }
    if opts.end < opts.start {
        anyhow::bail!("invalid range: end {} is before start {}", opts.end, opts.start);
    }

    if !ensure_gh_available(&mut report) {
        return Ok(report);
    }
    let tracker = GhCli::resolve()?;
    let repo = resolve_repo(&tracker, opts.repo.as_deref())?;
    report.detail(format!("repository: {repo}"));

    let count = opts.end - opts.start + 1;
    if !confirm.confirm(&format!(
        "Close issues #{}-#{} ({count} total) on {repo}?",
        opts.start, opts.end
    ))? {
        report.detail("cancelled".to_string());
        return Ok(report);
    }

    let comment = opts.comment.as_deref().unwrap_or(DEFAULT_CLOSE_COMMENT);
    let outcome = close_range(
        &tracker,
        &repo,
        opts.start,
        opts.end,
        comment,
        |number, error| match error {
            None => println!("  closed #{number}"),
            Some(err) => println!("  failed #{number}: {err}"),
        },
    );

    for (number, error) in &outcome.failed {
        report.issue(format!("issue #{number} failed to close: {error}"));
    }
    report.detail(format!(
        "{} closed, {} failed",
        outcome.closed.len(),
        outcome.failed.len()
    ));

    Ok(report)
}
