//! Line-oriented parser for the issue catalog document.
//!
//! Blocks open on `### Issue #<N>: <Title>`, accumulate a labels line
//! and three section bodies, and close on a `---` line, on the next
//! header, or at end of document. Parsing never fails; tolerated
//! grammar violations are surfaced as [`ParseWarning`]s alongside the
//! records.

use std::collections::HashSet;
use std::fmt;

use crate::catalog::record::IssueRecord;

const ISSUE_HEADER_PREFIX: &str = "### Issue #";
const LABELS_MARKER: &str = "**Labels:**";
const DESCRIPTION_MARKER: &str = "**Description:**";
const OBJECTIVES_MARKER: &str = "**Objectifs:**";
const ACCEPTANCE_MARKER: &str = "**Acceptance Criteria:**";
const TERMINATOR: &str = "---";

#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Keep blank lines inside section bodies. The legacy behavior
    /// (`false`) drops them, which loses paragraph breaks.
    pub keep_blank_lines: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            keep_blank_lines: false,
        }
    }
}

/// A tolerated grammar violation. Warnings never abort a parse; the
/// caller decides whether to surface or ignore them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A line that starts like an issue header but does not match
    /// `### Issue #<N>: <Title>` (non-numeric number, missing title).
    MalformedHeader { line: usize, text: String },
    /// Non-blank content inside a record before any section marker;
    /// such lines belong to no section and are dropped. Reported once
    /// per record.
    ContentOutsideSection { line: usize, number: u64 },
    /// A record closed without a `**Labels:**` line.
    MissingLabels { number: u64, title: String },
    /// A record flushed because the next header opened before its
    /// `---` terminator was seen.
    UnterminatedBlock { number: u64, title: String },
    /// A title that already appeared earlier in the document. Both
    /// records are kept; reconciliation will treat them as one.
    DuplicateTitle { number: u64, title: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedHeader { line, text } => {
                write!(f, "line {line}: malformed issue header: {text}")
            }
            Self::ContentOutsideSection { line, number } => {
                write!(
                    f,
                    "line {line}: content in issue #{number} before any section marker is dropped"
                )
            }
            Self::MissingLabels { number, title } => {
                write!(f, "issue #{number} '{title}' has no **Labels:** line")
            }
            Self::UnterminatedBlock { number, title } => {
                write!(f, "issue #{number} '{title}' is not closed by `---`")
            }
            Self::DuplicateTitle { number, title } => {
                write!(f, "issue #{number} duplicates the title '{title}'")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Description,
    Objectives,
    Acceptance,
}

struct OpenRecord {
    number: u64,
    title: String,
    labels: Vec<String>,
    labels_seen: bool,
    orphan_reported: bool,
    section: Option<Section>,
    description: String,
    objectives: String,
    acceptance: String,
}

impl OpenRecord {
    fn new(number: u64, title: String) -> Self {
        Self {
            number,
            title,
            labels: Vec::new(),
            labels_seen: false,
            orphan_reported: false,
            section: None,
            description: String::new(),
            objectives: String::new(),
            acceptance: String::new(),
        }
    }

    fn buffer(&mut self, section: Section) -> &mut String {
        match section {
            Section::Description => &mut self.description,
            Section::Objectives => &mut self.objectives,
            Section::Acceptance => &mut self.acceptance,
        }
    }
}

/// Parse the full document text into records (document order) plus the
/// warnings collected along the way.
pub fn parse_document(
    text: &str,
    opts: &ParserOptions,
) -> (Vec<IssueRecord>, Vec<ParseWarning>) {
    let mut parser = Parser {
        opts: *opts,
        records: Vec::new(),
        warnings: Vec::new(),
        seen_titles: HashSet::new(),
    };
    let mut open: Option<OpenRecord> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let stripped = line.trim();

        if stripped.starts_with(ISSUE_HEADER_PREFIX) {
            match split_header(stripped) {
                Some((number, title)) => {
                    if let Some(rec) = open.take() {
                        parser.warnings.push(ParseWarning::UnterminatedBlock {
                            number: rec.number,
                            title: rec.title.clone(),
                        });
                        parser.finish(rec);
                    }
                    open = Some(OpenRecord::new(number, title));
                    continue;
                }
                None => {
                    parser.warnings.push(ParseWarning::MalformedHeader {
                        line: line_no,
                        text: stripped.to_string(),
                    });
                    // Fall through: a near-miss header is an ordinary
                    // content line, as the grammar sees it.
                }
            }
        }

        if stripped == TERMINATOR {
            if let Some(rec) = open.take() {
                parser.finish(rec);
            }
            continue;
        }

        let Some(rec) = open.as_mut() else {
            // Front-matter, headings, commentary between blocks.
            continue;
        };

        if let Some(raw) = stripped.strip_prefix(LABELS_MARKER) {
            rec.labels = parse_labels(raw);
            rec.labels_seen = true;
            continue;
        }

        match stripped {
            DESCRIPTION_MARKER => {
                rec.section = Some(Section::Description);
                continue;
            }
            OBJECTIVES_MARKER => {
                rec.section = Some(Section::Objectives);
                continue;
            }
            ACCEPTANCE_MARKER => {
                rec.section = Some(Section::Acceptance);
                continue;
            }
            _ => {}
        }

        let blank = stripped.is_empty();
        match rec.section {
            Some(section) if !blank || parser.opts.keep_blank_lines => {
                let buf = rec.buffer(section);
                buf.push_str(line);
                buf.push('\n');
            }
            Some(_) => {}
            None => {
                if !blank && !rec.orphan_reported {
                    rec.orphan_reported = true;
                    parser.warnings.push(ParseWarning::ContentOutsideSection {
                        line: line_no,
                        number: rec.number,
                    });
                }
            }
        }
    }

    if let Some(rec) = open.take() {
        parser.finish(rec);
    }

    (parser.records, parser.warnings)
}

struct Parser {
    opts: ParserOptions,
    records: Vec<IssueRecord>,
    warnings: Vec<ParseWarning>,
    seen_titles: HashSet<String>,
}

impl Parser {
    fn finish(&mut self, rec: OpenRecord) {
        if !rec.labels_seen {
            self.warnings.push(ParseWarning::MissingLabels {
                number: rec.number,
                title: rec.title.clone(),
            });
        }
        if !self.seen_titles.insert(rec.title.clone()) {
            self.warnings.push(ParseWarning::DuplicateTitle {
                number: rec.number,
                title: rec.title.clone(),
            });
        }
        self.records.push(IssueRecord {
            number: rec.number,
            title: rec.title,
            labels: rec.labels,
            description: rec.description.trim().to_string(),
            objectives: rec.objectives.trim().to_string(),
            acceptance: rec.acceptance.trim().to_string(),
        });
    }
}

/// Match `### Issue #<N>: <Title>` on an already-trimmed line. The
/// number is digits only and the colon must be followed by a space.
fn split_header(stripped: &str) -> Option<(u64, String)> {
    let rest = stripped.strip_prefix(ISSUE_HEADER_PREFIX)?;
    let colon = rest.find(':')?;
    let digits = &rest[..colon];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let title = rest[colon + 1..].strip_prefix(' ')?.trim();
    if title.is_empty() {
        return None;
    }
    Some((digits.parse().ok()?, title.to_string()))
}

/// Split a labels CSV, trimming whitespace and stripping backtick and
/// single-quote decoration; blank entries are dropped.
fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tok| tok.trim().replace(['`', '\''], ""))
        .map(|tok| tok.trim().to_string())
        .filter(|tok| !tok.is_empty())
        .collect()
}
