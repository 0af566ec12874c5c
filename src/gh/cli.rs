//! `gh` binary wrapper implementing [`IssueTracker`].
//!
//! All stderr sniffing lives here: the raw `gh` exit status and
//! message text are mapped to typed [`TrackerError`] kinds at this
//! boundary and nowhere else.

use std::env;
use std::path::PathBuf;
use std::process::{Command, Output};

use crate::error::TrackerError;
use crate::gh::{IssueTracker, LabelOutcome, LabelSpec, RemoteIssue};

pub struct GhCli {
    bin: PathBuf,
}

impl GhCli {
    /// Resolve the `gh` binary from `ISSUESYNC_GH_BIN` or `PATH`.
    pub fn resolve() -> Result<Self, TrackerError> {
        Ok(Self {
            bin: resolve_gh_bin()?,
        })
    }

    fn run(&self, args: &[&str]) -> Result<Output, TrackerError> {
        Command::new(&self.bin)
            .args(args)
            .output()
            .map_err(TrackerError::Io)
    }
}

pub fn gh_available() -> bool {
    resolve_gh_bin().is_ok()
}

fn resolve_gh_bin() -> Result<PathBuf, TrackerError> {
    if let Ok(custom) = env::var("ISSUESYNC_GH_BIN") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    which::which("gh").map_err(|err| TrackerError::MissingBinary(err.to_string()))
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Map a failed `gh` invocation to a typed error kind.
fn classify_failure(command: &str, stderr: String) -> TrackerError {
    let lower = stderr.to_ascii_lowercase();
    if lower.contains("label") && lower.contains("not found") {
        return TrackerError::LabelRejected { stderr };
    }
    if lower.contains("rate limit") || lower.contains("submitted too quickly") {
        return TrackerError::RateLimited { stderr };
    }
    TrackerError::CommandFailed {
        command: command.to_string(),
        stderr,
    }
}

/// Pick the created-issue URL out of `gh issue create` stdout.
fn extract_issue_url(stdout: &str) -> Option<String> {
    stdout
        .split_whitespace()
        .find(|token| token.starts_with("https://") && token.contains("/issues/"))
        .map(ToOwned::to_owned)
}

impl IssueTracker for GhCli {
    fn detect_repo(&self) -> Result<String, TrackerError> {
        let out = self.run(&[
            "repo",
            "view",
            "--json",
            "nameWithOwner",
            "-q",
            ".nameWithOwner",
        ])?;
        if !out.status.success() {
            return Err(classify_failure("repo view", stderr_text(&out)));
        }
        let repo = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if repo.is_empty() {
            return Err(TrackerError::CommandFailed {
                command: "repo view".to_string(),
                stderr: "empty repository name".to_string(),
            });
        }
        Ok(repo)
    }

    fn list_issues(&self, repo: &str, limit: u32) -> Result<Vec<RemoteIssue>, TrackerError> {
        let limit = limit.to_string();
        let out = self.run(&[
            "issue",
            "list",
            "--repo",
            repo,
            "--limit",
            &limit,
            "--json",
            "number,title",
        ])?;
        if !out.status.success() {
            return Err(classify_failure("issue list", stderr_text(&out)));
        }
        let issues: Vec<RemoteIssue> = serde_json::from_slice(&out.stdout)?;
        Ok(issues)
    }

    fn create_issue(
        &self,
        repo: &str,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<String, TrackerError> {
        let mut args = vec![
            "issue", "create", "--repo", repo, "--title", title, "--body", body,
        ];
        for label in labels {
            if !label.is_empty() {
                args.push("--label");
                args.push(label);
            }
        }
        let out = self.run(&args)?;
        if !out.status.success() {
            return Err(classify_failure("issue create", stderr_text(&out)));
        }
        let stdout = String::from_utf8_lossy(&out.stdout);
        Ok(extract_issue_url(&stdout).unwrap_or_else(|| stdout.trim().to_string()))
    }

    fn add_label(&self, issue_url: &str, label: &str) -> Result<(), TrackerError> {
        let out = self.run(&["issue", "edit", issue_url, "--add-label", label])?;
        if !out.status.success() {
            return Err(classify_failure("issue edit", stderr_text(&out)));
        }
        Ok(())
    }

    fn close_issue(&self, repo: &str, number: u64, comment: &str) -> Result<(), TrackerError> {
        let number = number.to_string();
        let out = self.run(&[
            "issue", "close", &number, "--repo", repo, "--comment", comment,
        ])?;
        if !out.status.success() {
            return Err(classify_failure("issue close", stderr_text(&out)));
        }
        Ok(())
    }

    fn create_label(&self, repo: &str, label: &LabelSpec) -> Result<LabelOutcome, TrackerError> {
        let out = self.run(&[
            "label",
            "create",
            label.name,
            "--repo",
            repo,
            "--color",
            label.color,
            "--description",
            label.description,
        ])?;
        if out.status.success() {
            return Ok(LabelOutcome::Created);
        }
        let stderr = stderr_text(&out);
        if stderr.contains("already exists") || stderr.contains("already_exists") {
            return Ok(LabelOutcome::AlreadyExists);
        }
        Err(classify_failure("label create", stderr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_label_not_found_as_label_rejected() {
        let err = classify_failure(
            "issue create",
            "could not add label: 'ux' not found".to_string(),
        );
        assert!(matches!(err, TrackerError::LabelRejected { .. }));
    }

    #[test]
    fn classify_rate_limit_as_transient() {
        let err = classify_failure(
            "issue create",
            "HTTP 403: API rate limit exceeded".to_string(),
        );
        assert!(err.is_transient());

        let err = classify_failure(
            "issue create",
            "was submitted too quickly".to_string(),
        );
        assert!(err.is_transient());
    }

    #[test]
    fn classify_anything_else_as_command_failed() {
        let err = classify_failure("issue close", "HTTP 404: Not Found".to_string());
        assert!(matches!(err, TrackerError::CommandFailed { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn extract_issue_url_finds_the_issue_link() {
        let stdout = "Creating issue in acme/widgets\n\nhttps://github.com/acme/widgets/issues/12\n";
        assert_eq!(
            extract_issue_url(stdout).as_deref(),
            Some("https://github.com/acme/widgets/issues/12")
        );
    }

    #[test]
    fn extract_issue_url_ignores_non_issue_links() {
        assert_eq!(extract_issue_url("https://github.com/acme/widgets\n"), None);
    }
}
