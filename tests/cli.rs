use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("cypress-retries").unwrap()
}

#[test]
fn test_help_lists_run_flags() {
    cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--retries"))
        .stdout(predicate::str::contains("--ci-build-id"))
        .stdout(predicate::str::contains("--no-exit"));
}

#[test]
fn test_schema_prints_settings_schema() {
    cmd()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("node_binary"))
        .stdout(predicate::str::contains("retries"));
}

#[test]
fn test_zero_retries_is_usage_error() {
    cmd()
        .args(["run", "--retries", "0"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_malformed_env_is_usage_error() {
    cmd()
        .args(["run", "--env", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}

#[test]
fn test_missing_settings_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(["run", "--settings", "absent.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("absent.yaml"));
}

#[test]
fn test_cli_retries_override_invalid_settings_value() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("settings.yaml"),
        "retries: 0\nengine:\n  node_binary: ./missing-node\n",
    )
    .unwrap();

    // Without the flag the settings value is rejected
    cmd()
        .current_dir(dir.path())
        .args(["run", "--settings", "settings.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("retries must be at least 1"));

    // With -r the run gets past validation and fails launching the engine
    cmd()
        .current_dir(dir.path())
        .args(["run", "--settings", "settings.yaml", "-r", "2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("retries must be at least 1").not());
}

/// End-to-end runs against a stand-in for node that replays canned results
#[cfg(unix)]
mod fake_engine {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    // Called as `<node> -e <shim> <results-path>`; $3 is the results path.
    // Each invocation writes the next canned result, counting runs in a file.
    fn install(dir: &Path, results: &[&str]) -> PathBuf {
        for (i, result) in results.iter().enumerate() {
            fs::write(dir.join(format!("result-{}.json", i + 1)), result).unwrap();
        }
        let script = format!(
            "#!/bin/sh\n\
             cat > /dev/null\n\
             n=$(cat '{dir}/count' 2>/dev/null || echo 0)\n\
             n=$((n + 1))\n\
             echo $n > '{dir}/count'\n\
             [ -f '{dir}/result-'$n'.json' ] || exit 7\n\
             cp '{dir}/result-'$n'.json' \"$3\"\n",
            dir = dir.display()
        );
        let path = dir.join("fake-node");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        fs::write(
            dir.join("settings.yaml"),
            format!("engine:\n  node_binary: {}\n", path.display()),
        )
        .unwrap();
        path
    }

    fn runs(dir: &Path) -> u32 {
        fs::read_to_string(dir.join("count"))
            .unwrap()
            .trim()
            .parse()
            .unwrap()
    }

    const FAIL_ONE: &str = r#"{"totalFailed": 1, "runs": [{"stats": {"failures": 1}, "spec": {"relative": "a.spec.js"}}]}"#;
    const PASS: &str = r#"{"totalFailed": 0, "totalPassed": 1, "totalTests": 1, "runs": [{"stats": {"failures": 0}, "spec": {"relative": "a.spec.js"}}]}"#;

    #[test]
    fn test_exhaustion_exits_with_failure_total() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &[FAIL_ONE, FAIL_ONE, FAIL_ONE]);
        let summary = dir.path().join("summary.json");

        cmd()
            .current_dir(dir.path())
            .args(["run", "--settings", "settings.yaml", "--retries", "3"])
            .arg("--summary")
            .arg(&summary)
            .assert()
            .code(3);

        assert_eq!(runs(dir.path()), 3);
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(written["status"], "exhausted");
        assert_eq!(written["total_failures"], 3);
        assert_eq!(written["attempts"][0]["spec"], serde_json::Value::Null);
        assert_eq!(written["attempts"][1]["spec"][0], "a.spec.js");
    }

    #[test]
    fn test_passing_retry_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &[FAIL_ONE, PASS]);

        cmd()
            .current_dir(dir.path())
            .args(["run", "--settings", "settings.yaml", "--retries", "3"])
            .assert()
            .success();

        assert_eq!(runs(dir.path()), 2);
    }

    #[test]
    fn test_engine_crash_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &[FAIL_ONE]);

        cmd()
            .current_dir(dir.path())
            .args(["run", "--settings", "settings.yaml", "--retries", "3"])
            .assert()
            .code(1);

        assert_eq!(runs(dir.path()), 2);
    }

    #[test]
    fn test_engine_level_failure_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        install(
            dir.path(),
            &[r#"{"status": "failed", "failures": 1, "message": "Cypress could not verify that this server is running"}"#],
        );

        cmd()
            .current_dir(dir.path())
            .args(["run", "--settings", "settings.yaml"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("could not verify"));

        assert_eq!(runs(dir.path()), 1);
    }
}
