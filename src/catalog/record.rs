use serde::Serialize;

/// One structured issue extracted from the catalog document.
///
/// `number` is the author-assigned ordinal from the document; it drives
/// sort order and display only and is never compared against remote
/// ids. `title` is the sole identity key used for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub labels: Vec<String>,
    pub description: String,
    pub objectives: String,
    pub acceptance: String,
}

impl IssueRecord {
    /// Render the markdown body sent to the tracker: non-empty sections
    /// only, each under its own heading, joined by blank lines, in the
    /// fixed order Description, Objectifs, Acceptance Criteria.
    pub fn body(&self) -> String {
        let mut parts = Vec::new();
        if !self.description.is_empty() {
            parts.push(format!("## Description\n\n{}", self.description));
        }
        if !self.objectives.is_empty() {
            parts.push(format!("## Objectifs\n\n{}", self.objectives));
        }
        if !self.acceptance.is_empty() {
            parts.push(format!("## Acceptance Criteria\n\n{}", self.acceptance));
        }
        parts.join("\n\n")
    }
}

/// Stable ascending sort by declared number; duplicate numbers keep
/// their document order.
pub fn sort_by_number(records: &mut [IssueRecord]) {
    records.sort_by_key(|r| r.number);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(number: u64, title: &str) -> IssueRecord {
        IssueRecord {
            number,
            title: title.to_string(),
            labels: Vec::new(),
            description: String::new(),
            objectives: String::new(),
            acceptance: String::new(),
        }
    }

    #[test]
    fn body_renders_sections_in_fixed_order() {
        let mut rec = record(1, "t");
        rec.acceptance = "done when green".to_string();
        rec.description = "what".to_string();
        rec.objectives = "why".to_string();

        assert_eq!(
            rec.body(),
            "## Description\n\nwhat\n\n## Objectifs\n\nwhy\n\n## Acceptance Criteria\n\ndone when green"
        );
    }

    #[test]
    fn body_skips_empty_sections() {
        let mut rec = record(1, "t");
        rec.objectives = "only this".to_string();

        assert_eq!(rec.body(), "## Objectifs\n\nonly this");
    }

    #[test]
    fn body_is_empty_when_all_sections_are_empty() {
        assert_eq!(record(1, "t").body(), "");
    }

    #[test]
    fn sort_by_number_is_stable_for_duplicates() {
        let mut records = vec![record(2, "b"), record(1, "a"), record(2, "c")];
        sort_by_number(&mut records);

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }
}
