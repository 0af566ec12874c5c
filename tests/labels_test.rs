use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_fake_gh(bin_path: &Path) {
    let script = r#"#!/usr/bin/env bash
set -euo pipefail

if [[ -n "${GH_TEST_LOG:-}" ]]; then
  printf '%s\n' "$*" >> "${GH_TEST_LOG}"
fi

if [[ "${1:-}" == "label" && "${2:-}" == "create" ]]; then
  if [[ "${3:-}" == "bug" ]]; then
    echo "HTTP 422: label already exists" >&2
    exit 1
  fi
  if [[ "${3:-}" == "security" ]]; then
    echo "HTTP 500: server error" >&2
    exit 1
  fi
fi
exit 0
"#;
    fs::write(bin_path, script).expect("write fake gh");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(bin_path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(bin_path, perms).expect("chmod");
    }
}

#[test]
fn labels_tolerate_already_exists_but_not_other_failures() {
    let tmp = tempdir().expect("tempdir");
    let log = tmp.path().join("gh.log");

    let gh = tmp.path().join("gh");
    write_fake_gh(&gh);

    assert_cmd::cargo::cargo_bin_cmd!("issuesync")
        .current_dir(tmp.path())
        .env("ISSUESYNC_GH_BIN", &gh)
        .env("GH_TEST_LOG", &log)
        .env("ISSUESYNC_CONFIG_PATH", tmp.path().join("no-config.toml"))
        .args(["labels", "acme/widgets"])
        .assert()
        .failure()
        .stdout(predicates::str::contains("label 'bug' already exists"))
        .stdout(predicates::str::contains("14/15 labels in place"))
        .stderr(predicates::str::contains("label 'security' failed"));

    let calls = fs::read_to_string(&log).expect("read gh log");
    let creates = calls
        .lines()
        .filter(|line| line.starts_with("label create"))
        .count();
    // One hard failure does not stop the remaining labels.
    assert_eq!(creates, 15);
}
