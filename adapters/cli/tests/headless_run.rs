use std::process::Command;

#[test]
fn headless_run_prints_a_json_report() {
    let output = Command::new(env!("CARGO_BIN_EXE_hexbound"))
        .args(["--seed", "7", "--seconds", "2", "--fps", "30"])
        .output()
        .expect("failed to run hexbound binary");

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON report");
    assert_eq!(report["seed"], 7);
    assert_eq!(report["frames"], 60);
    assert_eq!(report["ended"], false);
    assert_eq!(report["summary"]["wave"], 1);
}

#[test]
fn unreadable_config_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_hexbound"))
        .args(["--config", "does/not/exist.toml", "--seconds", "0"])
        .output()
        .expect("failed to run hexbound binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config file"));
}
