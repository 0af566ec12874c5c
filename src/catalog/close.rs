//! Close a contiguous span of remote issue ids with a fixed comment,
//! isolating per-item failures the same way the synchronizer does.

use crate::error::TrackerError;
use crate::gh::IssueTracker;

/// Comment attached when no override is given.
pub const DEFAULT_CLOSE_COMMENT: &str = "Closing as a duplicate of an earlier issue.";

#[derive(Debug, Default)]
pub struct CloseOutcome {
    pub closed: Vec<u64>,
    pub failed: Vec<(u64, TrackerError)>,
}

/// Close every id in `[start, end]` in ascending order. A failed close
/// is tallied and the loop continues.
pub fn close_range<T: IssueTracker + ?Sized>(
    tracker: &T,
    repo: &str,
    start: u64,
    end: u64,
    comment: &str,
    mut progress: impl FnMut(u64, Option<&TrackerError>),
) -> CloseOutcome {
    let mut outcome = CloseOutcome::default();
    for number in start..=end {
        match tracker.close_issue(repo, number, comment) {
            Ok(()) => {
                progress(number, None);
                outcome.closed.push(number);
            }
            Err(error) => {
                progress(number, Some(&error));
                outcome.failed.push((number, error));
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gh::{LabelOutcome, LabelSpec, RemoteIssue};
    use std::cell::RefCell;

    struct FakeCloser {
        fail_on: Vec<u64>,
        calls: RefCell<Vec<u64>>,
    }

    impl IssueTracker for FakeCloser {
        fn detect_repo(&self) -> Result<String, TrackerError> {
            Ok("acme/widgets".to_string())
        }

        fn list_issues(&self, _repo: &str, _limit: u32) -> Result<Vec<RemoteIssue>, TrackerError> {
            Ok(Vec::new())
        }

        fn create_issue(
            &self,
            _repo: &str,
            _title: &str,
            _body: &str,
            _labels: &[String],
        ) -> Result<String, TrackerError> {
            unimplemented!("range closer never creates")
        }

        fn add_label(&self, _issue_url: &str, _label: &str) -> Result<(), TrackerError> {
            unimplemented!("range closer never labels")
        }

        fn close_issue(&self, _repo: &str, number: u64, _comment: &str) -> Result<(), TrackerError> {
            self.calls.borrow_mut().push(number);
            if self.fail_on.contains(&number) {
                return Err(TrackerError::CommandFailed {
                    command: "issue close".to_string(),
                    stderr: format!("issue #{number} not found"),
                });
            }
            Ok(())
        }

        fn create_label(
            &self,
            _repo: &str,
            _label: &LabelSpec,
        ) -> Result<LabelOutcome, TrackerError> {
            unimplemented!("range closer never creates labels")
        }
    }

    #[test]
    fn closes_the_whole_range_in_ascending_order() {
        let tracker = FakeCloser {
            fail_on: Vec::new(),
            calls: RefCell::new(Vec::new()),
        };

        let outcome = close_range(&tracker, "acme/widgets", 56, 60, "dup", |_, _| {});

        assert_eq!(outcome.closed, vec![56, 57, 58, 59, 60]);
        assert!(outcome.failed.is_empty());
        assert_eq!(*tracker.calls.borrow(), vec![56, 57, 58, 59, 60]);
    }

    #[test]
    fn a_failed_close_does_not_stop_the_rest() {
        let tracker = FakeCloser {
            fail_on: vec![57, 59],
            calls: RefCell::new(Vec::new()),
        };

        let outcome = close_range(&tracker, "acme/widgets", 56, 60, "dup", |_, _| {});

        assert_eq!(outcome.closed, vec![56, 58, 60]);
        assert_eq!(outcome.failed.len(), 2);
        assert_eq!(outcome.failed[0].0, 57);
        assert_eq!(outcome.failed[1].0, 59);
    }

    #[test]
    fn single_id_range_is_closed() {
        let tracker = FakeCloser {
            fail_on: Vec::new(),
            calls: RefCell::new(Vec::new()),
        };

        let outcome = close_range(&tracker, "acme/widgets", 7, 7, "dup", |_, _| {});

        assert_eq!(outcome.closed, vec![7]);
    }
}
