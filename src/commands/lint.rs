use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::catalog::config::SyncConfig;
use crate::catalog::parser::parse_document;
use crate::catalog::record::IssueRecord;
use crate::commands::CommandReport;

#[derive(Debug, Clone)]
pub struct LintOptions {
    pub file: PathBuf,
    pub json: bool,
}

#[derive(Serialize)]
struct LintOutput<'a> {
    records: &'a [IssueRecord],
    warnings: Vec<String>,
}

/// Parse the catalog locally and report what a sync run would see.
/// No remote calls.
pub fn run(opts: &LintOptions, cfg: &SyncConfig) -> Result<CommandReport> {
    let mut report = CommandReport::new("lint");

    let text = fs::read_to_string(&opts.file)
        .with_context(|| format!("failed to read {}", opts.file.display()))?;
    let (records, warnings) = parse_document(&text, &cfg.parser_options());

    if opts.json {
        let out = LintOutput {
            records: &records,
            warnings: warnings.iter().map(ToString::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for record in &records {
            println!(
                "  #{}: {} [{}]",
                record.number,
                record.title,
                record.labels.join(", ")
            );
        }
        for warning in &warnings {
            eprintln!("warning: {warning}");
        }
    }

    report.detail(format!(
        "{} records, {} warnings in {}",
        records.len(),
        warnings.len(),
        opts.file.display()
    ));
    if records.is_empty() {
        report.issue(format!("no issue blocks found in {}", opts.file.display()));
    }

    Ok(report)
}
