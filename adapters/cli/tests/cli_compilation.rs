use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "arena-survival"])
        .status()
        .expect("failed to invoke cargo check for arena-survival CLI binary");

    assert!(status.success(), "cargo check --bin arena-survival should succeed");
}

#[test]
fn help_lists_session_options() {
    let output = Command::new(env!("CARGO_BIN_EXE_arena-survival"))
        .arg("--help")
        .output()
        .expect("failed to run arena-survival --help");

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in ["--config", "--seed", "--player", "--scores", "--max-rounds", "--max-seconds"] {
        assert!(help.contains(flag), "--help should document {flag}");
    }
}

#[test]
fn unknown_flags_are_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_arena-survival"))
        .arg("--difficulty")
        .output()
        .expect("failed to run arena-survival");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--difficulty"));
}
