//! Sequential, partial-failure-tolerant creation of missing records.
//!
//! One record's failure never aborts the batch. Label rejection falls
//! back to a label-free creation followed by individual re-attach;
//! transient failures get bounded exponential backoff; everything else
//! is tallied and the loop moves on.

use std::thread;
use std::time::Duration;

use crate::catalog::record::{sort_by_number, IssueRecord};
use crate::error::TrackerError;
use crate::gh::IssueTracker;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Fixed pause between consecutive creations, skipped after the
    /// last record.
    pub request_delay: Duration,
    /// Retry a `LabelRejected` creation once without labels, then
    /// re-attach each label individually.
    pub label_fallback: bool,
    /// Extra attempts for transient failures before giving up on a
    /// record.
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(1500),
            label_fallback: true,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            retry_max_delay: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatedIssue {
    pub number: u64,
    pub title: String,
    pub url: String,
}

#[derive(Debug)]
pub struct FailedRecord {
    pub number: u64,
    pub title: String,
    pub error: TrackerError,
}

/// Aggregate outcome of one synchronizer run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: Vec<CreatedIssue>,
    pub failed: Vec<FailedRecord>,
}

/// Progress seam so the engine stays print-free. The console
/// implementation lives at the command layer.
pub trait SyncObserver {
    fn creating(&mut self, _record: &IssueRecord, _position: usize, _total: usize) {}
    fn created(&mut self, _record: &IssueRecord, _url: &str) {}
    fn failed(&mut self, _record: &IssueRecord, _error: &TrackerError) {}
    fn retrying_without_labels(&mut self, _record: &IssueRecord) {}
    fn label_attach_failed(&mut self, _record: &IssueRecord, _label: &str, _error: &TrackerError) {}
    fn backing_off(&mut self, _record: &IssueRecord, _attempt: u32, _delay: Duration) {}
}

/// Create every missing record, in ascending `number` order, against
/// the tracker. Never returns early: each record either lands in
/// `created` or in `failed`.
pub fn synchronize<T: IssueTracker + ?Sized>(
    tracker: &T,
    repo: &str,
    missing: &[IssueRecord],
    opts: &SyncOptions,
    observer: &mut dyn SyncObserver,
) -> SyncReport {
    let mut queue = missing.to_vec();
    sort_by_number(&mut queue);

    let mut report = SyncReport::default();
    let total = queue.len();
    for (idx, record) in queue.iter().enumerate() {
        observer.creating(record, idx + 1, total);
        match create_one(tracker, repo, record, opts, observer) {
            Ok(url) => {
                observer.created(record, &url);
                report.created.push(CreatedIssue {
                    number: record.number,
                    title: record.title.clone(),
                    url,
                });
            }
            Err(error) => {
                observer.failed(record, &error);
                report.failed.push(FailedRecord {
                    number: record.number,
                    title: record.title.clone(),
                    error,
                });
            }
        }
        if idx + 1 < total && !opts.request_delay.is_zero() {
            thread::sleep(opts.request_delay);
        }
    }
    report
}

fn create_one<T: IssueTracker + ?Sized>(
    tracker: &T,
    repo: &str,
    record: &IssueRecord,
    opts: &SyncOptions,
    observer: &mut dyn SyncObserver,
) -> Result<String, TrackerError> {
    let body = record.body();
    match create_with_backoff(tracker, repo, record, &body, &record.labels, opts, observer) {
        Err(TrackerError::LabelRejected { .. })
            if opts.label_fallback && !record.labels.is_empty() =>
        {
            observer.retrying_without_labels(record);
            let url = create_with_backoff(tracker, repo, record, &body, &[], opts, observer)?;
            // The issue exists now; a label that still will not stick
            // is not worth losing it over.
            for label in &record.labels {
                if let Err(error) = tracker.add_label(&url, label) {
                    observer.label_attach_failed(record, label, &error);
                }
            }
            Ok(url)
        }
        other => other,
    }
}

fn create_with_backoff<T: IssueTracker + ?Sized>(
    tracker: &T,
    repo: &str,
    record: &IssueRecord,
    body: &str,
    labels: &[String],
    opts: &SyncOptions,
    observer: &mut dyn SyncObserver,
) -> Result<String, TrackerError> {
    let mut attempt: u32 = 0;
    loop {
        match tracker.create_issue(repo, &record.title, body, labels) {
            Err(error) if error.is_transient() && attempt < opts.max_retries => {
                let delay = backoff_delay(opts, attempt);
                observer.backing_off(record, attempt + 1, delay);
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                attempt += 1;
            }
            other => return other,
        }
    }
}

fn backoff_delay(opts: &SyncOptions, attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    opts.retry_base_delay
        .saturating_mul(factor)
        .min(opts.retry_max_delay)
}
