//! End-to-end tests of the `surebet` binary against a temporary ledger file.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use rust_decimal_macros::dec;
use surebet::testkit::domain::{base_time, hours_later, opportunity};
use tempfile::TempDir;

/// A working directory holding a config that points the ledger inside it.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let ledger = dir.path().join("ledger.json");
        let config = format!(
            "[storage]\nbackend = \"file\"\npath = {ledger:?}\n\n\
             [source]\napi_url = \"http://127.0.0.1:9\"\ntimeout_ms = 2000\nconnect_timeout_ms = 500\n\n\
             [[source.feeds]]\nsport = \"tennis\"\nkeys = [\"tennis_atp\"]\n\n{extra}"
        );
        fs::write(dir.path().join("config.toml"), config).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("surebet");
        cmd.current_dir(self.path())
            .env_remove("ODDS_API_KEY")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config());
        cmd
    }

    /// Seed the active set through `admin import`.
    fn import_sample(&self) {
        let records = vec![
            opportunity("evt-1", &[dec!(2.10), dec!(2.05)], hours_later(3), base_time()),
            opportunity("evt-2", &[dec!(2.02), dec!(2.02)], hours_later(4), base_time()),
        ];
        let file = self.path().join("import.json");
        fs::write(&file, serde_json::to_string(&records).unwrap()).unwrap();

        self.cmd()
            .args(["admin", "import"])
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("Imported 2"));
    }
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    let last = text.lines().last().unwrap_or_default();
    serde_json::from_str(last).unwrap_or_else(|e| panic!("not JSON ({e}): {text}"))
}

#[test]
fn help_lists_the_commands() {
    cargo_bin_cmd!("surebet")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("active"))
        .stdout(predicate::str::contains("allocate"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn check_config_reports_a_valid_file() {
    let ws = Workspace::new("");
    let value = json_stdout(ws.cmd().args(["--json", "check", "config"]));

    assert_eq!(value["valid"], true);
    assert_eq!(value["api_key_present"], false);
    assert_eq!(value["feeds"][0], "tennis_atp");
}

#[test]
fn invalid_config_exits_nonzero() {
    let ws = Workspace::new("[schedule]\ninterval_secs = 0\n");
    ws.cmd()
        .args(["check", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("schedule.interval_secs"));
}

#[test]
fn status_of_a_fresh_ledger() {
    let ws = Workspace::new("");
    let value = json_stdout(ws.cmd().args(["--json", "status"]));

    assert_eq!(value["active"], 0);
    assert_eq!(value["history"], 0);
    assert!(value["last_sync"].is_null());
}

#[test]
fn imported_opportunities_are_listed_and_allocated() {
    let ws = Workspace::new("");
    ws.import_sample();

    let active = json_stdout(ws.cmd().args(["--json", "active"]));
    assert_eq!(active["count"], 2);
    assert_eq!(active["opportunities"][0]["id"], "evt-1");

    let plan = json_stdout(ws.cmd().args(["--json", "allocate", "evt-1", "--stake", "100"]));
    assert_eq!(plan["plan"]["legs"][0]["stake"], "49");
    assert_eq!(plan["plan"]["legs"][1]["stake"], "51");

    ws.cmd()
        .args(["active", "--fractional"])
        .assert()
        .success()
        .stdout(predicate::str::contains("11/10"));
}

#[test]
fn allocate_unknown_id_fails() {
    let ws = Workspace::new("");
    ws.cmd()
        .args(["allocate", "missing", "--stake", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("opportunity not found: missing"));
}

#[test]
fn remove_and_export_round_out_the_admin_surface() {
    let ws = Workspace::new("");
    ws.import_sample();

    ws.cmd()
        .args(["admin", "remove", "evt-2"])
        .assert()
        .success();

    let export = ws.path().join("export.json");
    ws.cmd()
        .args(["admin", "export", "--output"])
        .arg(&export)
        .assert()
        .success();
    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(exported.as_array().map(Vec::len), Some(1));
}

#[test]
fn clear_needs_confirmation() {
    let ws = Workspace::new("");
    ws.import_sample();

    ws.cmd().args(["admin", "clear"]).assert().success();
    let status = json_stdout(ws.cmd().args(["--json", "status"]));
    assert_eq!(status["active"], 2);

    ws.cmd().args(["admin", "clear", "--yes"]).assert().success();
    let status = json_stdout(ws.cmd().args(["--json", "status"]));
    assert_eq!(status["active"], 0);
}

#[test]
fn disallowed_admin_action_is_refused() {
    let ws = Workspace::new("[admin]\nallowed_actions = [\"import_ledger\"]\n");
    ws.import_sample();

    ws.cmd()
        .args(["admin", "clear", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not authorized to clear_ledger"));
}

#[test]
fn settings_are_stored_and_shown() {
    let ws = Workspace::new("");
    ws.cmd()
        .args(["admin", "settings", "--active", "false", "--threshold", "6"])
        .assert()
        .success();

    let value = json_stdout(ws.cmd().args(["--json", "admin", "settings"]));
    assert_eq!(value["settings"]["is_active"], false);
    assert_eq!(value["settings"]["alert_threshold_percent"], "6");
}

#[test]
fn scan_without_api_key_fails_cleanly() {
    let ws = Workspace::new("");
    ws.cmd()
        .arg("scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ODDS_API_KEY"));
}

#[test]
fn unreachable_source_leaves_the_ledger_untouched() {
    let ws = Workspace::new("");
    ws.import_sample();

    let value = json_stdout(ws.cmd().env("ODDS_API_KEY", "test-key").args(["--json", "scan"]));
    assert_eq!(value["status"], "source_unavailable");

    let status = json_stdout(ws.cmd().args(["--json", "status"]));
    assert_eq!(status["active"], 2);
    assert!(status["last_sync"].is_null());
}
