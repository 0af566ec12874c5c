pub mod cli;

use serde::Deserialize;

use crate::error::TrackerError;

pub use self::cli::{gh_available, GhCli};

/// One issue as reported by the remote listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteIssue {
    pub number: u64,
    pub title: String,
}

/// A label definition for catalog bootstrap.
#[derive(Debug, Clone, Copy)]
pub struct LabelSpec {
    pub name: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOutcome {
    Created,
    AlreadyExists,
}

/// The remote collaborator interface. The engines only ever talk to
/// this trait; `GhCli` is the production implementation and tests
/// substitute an in-memory fake.
pub trait IssueTracker {
    fn detect_repo(&self) -> Result<String, TrackerError>;

    fn list_issues(&self, repo: &str, limit: u32) -> Result<Vec<RemoteIssue>, TrackerError>;

    /// Create an issue and return its URL.
    fn create_issue(
        &self,
        repo: &str,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<String, TrackerError>;

    fn add_label(&self, issue_url: &str, label: &str) -> Result<(), TrackerError>;

    fn close_issue(&self, repo: &str, number: u64, comment: &str) -> Result<(), TrackerError>;

    fn create_label(&self, repo: &str, label: &LabelSpec) -> Result<LabelOutcome, TrackerError>;
}
