//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own settings directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_stdin(dir, args, "")
}

fn run_cli_with_stdin(dir: &Path, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stenocombo"))
        .args(args)
        .env("STENOCOMBO_CONFIG_DIR", dir)
        .env_remove("STENOCOMBO_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn run_cli_success(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_config_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "cooldown_duration"]).trim(), "2000");
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "alignment"]).trim(), "center");
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "font_name"]).trim(), "Plover Retro");
}

#[test]
fn test_config_set_persists() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["config", "set", "cooldown_duration", "1500"]).trim(), "ok");
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "cooldown_duration"]).trim(), "1500");
    assert!(dir.path().join("settings.toml").exists());

    run_cli_success(dir.path(), &["config", "set", "alignment", "right"]);
    let list = run_cli_success(dir.path(), &["config", "list"]);
    assert!(list.contains("alignment = right"));
    assert!(list.contains("cooldown_duration = 1500"));
}

#[test]
fn test_config_set_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "cooldown_duration", "50"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("out of range"), "{stderr}");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "dark_mode", "maybe"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("dark_mode"), "{stderr}");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "no_such_key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"), "{stderr}");

    assert_eq!(run_cli_success(dir.path(), &["config", "get", "cooldown_duration"]).trim(), "2000");
}

#[test]
fn test_config_list_json() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["config", "list", "--json"]);
    let config: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(config["reset_on_undo"], true);
    assert_eq!(config["zoom_scale_percent"], 84);
    assert_eq!(config["alignment"], "center");
}

#[test]
fn test_config_fields_json() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["config", "fields", "--json"]);
    let fields: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(fields.len(), 25);
    assert_eq!(fields[0]["key"], "highscore");
    assert_eq!(fields[24]["key"], "combo_colors");
}

#[test]
fn test_config_reset_keeps_high_score() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "highscore", "42"]);
    run_cli_success(dir.path(), &["config", "set", "bar_width", "20"]);
    run_cli_success(dir.path(), &["config", "reset"]);

    assert_eq!(run_cli_success(dir.path(), &["config", "get", "bar_width"]).trim(), "12");
    assert_eq!(run_cli_success(dir.path(), &["highscore", "show"]).trim(), "42");
}

#[test]
fn test_colors_lookup() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(
        dir.path(),
        &["config", "set", "combo_colors", "0: #3EA7ED, #6ABBF1\\n10: #62DDDF, #88E5E7"],
    );

    let tier = |count: &str| {
        run_cli_success(dir.path(), &["colors", "lookup", count])
            .split_whitespace()
            .next()
            .unwrap()
            .to_string()
    };
    assert_eq!(tier("5"), "0");
    assert_eq!(tier("10"), "10");
    assert_eq!(tier("15"), "10");
    assert_eq!(tier("-3"), "0");
}

#[test]
fn test_colors_show_json() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["colors", "show", "--json"]);
    let entries: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    let milestones: Vec<u64> = entries
        .iter()
        .map(|e| e["milestone"].as_u64().unwrap())
        .collect();
    assert_eq!(milestones, vec![0, 10, 25, 50, 100, 250, 500, 1000, 2500]);
}

#[test]
fn test_colors_check_reports_skipped_lines() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("colors.txt");
    std::fs::write(&file, "0: #000000, #111111\nbogus\n5: #GGGGGG, #111111\n").unwrap();

    let stdout = run_cli_success(dir.path(), &["colors", "check", "--file", file.to_str().unwrap()]);
    assert!(stdout.contains("line 2: bogus"), "{stdout}");
    assert!(stdout.contains("line 3:"), "{stdout}");
    assert!(stdout.contains("1 tiers, 2 lines skipped"), "{stdout}");
}

#[test]
fn test_highscore_reset() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "highscore", "7"]);
    assert_eq!(run_cli_success(dir.path(), &["highscore", "show"]).trim(), "7");
    run_cli_success(dir.path(), &["highscore", "reset"]);
    assert_eq!(run_cli_success(dir.path(), &["highscore", "show"]).trim(), "0");
}

#[test]
fn test_simulate_cooldown_reset() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["simulate", "stroke:3 wait 2500"]);
    let lines = json_lines(&stdout);

    let reset = lines
        .iter()
        .find(|l| l["event"]["type"] == "combo_reset")
        .unwrap();
    assert_eq!(reset["elapsed_ms"], 2000);
    assert_eq!(reset["event"]["reason"], "cooldown_expired");
    assert_eq!(reset["event"]["final_count"], 3);

    let snapshot = lines.last().unwrap();
    assert_eq!(snapshot["counter"], 0);
    assert_eq!(snapshot["high_score"], 3);

    // Simulation never persists.
    assert_eq!(run_cli_success(dir.path(), &["highscore", "show"]).trim(), "0");
}

#[test]
fn test_simulate_summary_and_errors() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["simulate", "--summary", "s:10"]);
    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["counter"], 10);
    assert_eq!(lines[0]["tier"], 10);

    let (_, stderr, code) = run_cli(dir.path(), &["simulate", "s jump"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("jump"), "{stderr}");

    let (_, stderr, code) = run_cli(dir.path(), &["simulate", "s wait 18446744073709551615"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("one year"), "{stderr}");
}

#[test]
fn test_live_saves_high_score() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) =
        run_cli_with_stdin(dir.path(), &["live"], "STKPW\nHRAOEUF\n*\nTKPWHR\n");
    assert_eq!(code, 0, "{stderr}");

    let events = json_lines(&stdout);
    assert!(events
        .iter()
        .any(|e| e["type"] == "combo_reset" && e["reason"] == "correction" && e["final_count"] == 2));
    assert_eq!(run_cli_success(dir.path(), &["highscore", "show"]).trim(), "2");
}

#[test]
fn test_simulate_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("script.txt");
    std::fs::write(&file, "# warm up\nstroke:4\nwait 500\nundo\n").unwrap();

    let stdout = run_cli_success(
        dir.path(),
        &["simulate", "--summary", "--file", file.to_str().unwrap()],
    );
    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["counter"], 0);
    assert_eq!(lines[0]["high_score"], 4);
}
