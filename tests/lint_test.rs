use std::fs;
use tempfile::tempdir;

#[test]
fn lint_reports_records_and_warnings_without_touching_gh() {
    let catalog = "\
### Issue #1: Add retries

**Labels:** bug

**Description:**

Calls fail on flaky networks.

---

### Issue #2: No labels here

**Description:**

This block forgot its labels line.

---
";
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("ISSUES.md");
    fs::write(&file, catalog).expect("write catalog");

    assert_cmd::cargo::cargo_bin_cmd!("issuesync")
        .current_dir(tmp.path())
        .env("ISSUESYNC_CONFIG_PATH", tmp.path().join("no-config.toml"))
        .args(["lint", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicates::str::contains("2 records, 1 warnings"))
        .stderr(predicates::str::contains("no **Labels:** line"));
}

#[test]
fn lint_fails_on_a_document_with_no_blocks() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("ISSUES.md");
    fs::write(&file, "# Just a heading\n\nprose only\n").expect("write catalog");

    assert_cmd::cargo::cargo_bin_cmd!("issuesync")
        .current_dir(tmp.path())
        .env("ISSUESYNC_CONFIG_PATH", tmp.path().join("no-config.toml"))
        .args(["lint", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicates::str::contains("no issue blocks"));
}

#[test]
fn lint_json_output_is_machine_readable() {
    let catalog = "\
### Issue #3: Structured output

**Labels:** `technical`

**Description:**

For tooling.

---
";
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("ISSUES.md");
    fs::write(&file, catalog).expect("write catalog");

    let assert = assert_cmd::cargo::cargo_bin_cmd!("issuesync")
        .current_dir(tmp.path())
        .env("ISSUESYNC_CONFIG_PATH", tmp.path().join("no-config.toml"))
        .args(["lint", "--json", "--file"])
        .arg(&file)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let json_start = stdout.find('{').expect("json in output");
    let parsed: serde_json::Value =
        serde_json::from_str(stdout[json_start..].trim_end_matches(|c| c != '}'))
            .expect("valid json");
    assert_eq!(parsed["records"][0]["title"], "Structured output");
    assert_eq!(parsed["records"][0]["labels"][0], "technical");
}
