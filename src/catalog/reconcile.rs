//! Pure reconciliation of parsed records against the remote snapshot.
//!
//! Membership is exact string equality on the title. No case-folding,
//! no whitespace normalization: a title differing by trailing
//! whitespace is a different issue and will be created as new.

use std::collections::HashMap;

use crate::catalog::record::IssueRecord;
use crate::gh::RemoteIssue;

/// Read-only snapshot of the remote issue list, keyed by exact title.
pub type RemoteIndex = HashMap<String, u64>;

/// Collapse the listing into a title -> id map. Remote duplicates keep
/// the last id seen.
pub fn build_index(remote: &[RemoteIssue]) -> RemoteIndex {
    remote
        .iter()
        .map(|issue| (issue.title.clone(), issue.number))
        .collect()
}

#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Records already represented remotely, with their remote id.
    pub present: Vec<(IssueRecord, u64)>,
    /// Records with no remote counterpart, in input order.
    pub missing: Vec<IssueRecord>,
}

pub fn reconcile(records: &[IssueRecord], index: &RemoteIndex) -> Reconciliation {
    let mut out = Reconciliation::default();
    for record in records {
        match index.get(&record.title) {
            Some(&id) => out.present.push((record.clone(), id)),
            None => out.missing.push(record.clone()),
        }
    }
    out
}
