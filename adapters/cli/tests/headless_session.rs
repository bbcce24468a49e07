use std::{fs, process::Command};

use serde_json::Value;

fn arena_survival() -> Command {
    Command::new(env!("CARGO_BIN_EXE_arena-survival"))
}

#[test]
fn short_session_records_a_score() {
    let dir = tempfile::tempdir().expect("temp dir");
    let scores = dir.path().join("settings.json");

    let output = arena_survival()
        .args(["--seed", "7", "--player", "tester", "--max-seconds", "2", "--scores"])
        .arg(&scores)
        .output()
        .expect("failed to run arena-survival");
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Score:      0"), "{stdout}");
    assert!(stdout.contains("1. tester"), "{stdout}");

    let document: Value =
        serde_json::from_str(&fs::read_to_string(&scores).expect("scores written"))
            .expect("valid json");
    assert_eq!(document["highScoreTable"]["entries"][0]["name"], "tester");
}

#[test]
fn configuration_file_is_applied() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("game.toml");
    fs::write(&config, "player_name = \"from-config\"\nstart_delay_secs = 1.0\n")
        .expect("write config");

    let output = arena_survival()
        .args(["--max-seconds", "1", "--config"])
        .arg(&config)
        .output()
        .expect("failed to run arena-survival");
    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("1. from-config"));
}

#[test]
fn malformed_configuration_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("broken.toml");
    fs::write(&config, "start_delay_secs = [").expect("write config");

    let output = arena_survival()
        .arg("--config")
        .arg(&config)
        .output()
        .expect("failed to run arena-survival");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid configuration"));
}
