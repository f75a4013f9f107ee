use std::process::Command;

#[test]
fn test_version_flag() {
    // Build the binary path
    let binary_path = env!("CARGO_BIN_EXE_kbtree");

    let output = Command::new(binary_path)
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    assert!(
        output.status.success(),
        "Version flag should exit with code 0"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.trim().strip_prefix("kbtree ").unwrap_or("");
    assert_eq!(
        version,
        env!("CARGO_PKG_VERSION"),
        "Binary version should match CARGO_PKG_VERSION"
    );
}

#[test]
fn test_help_flag_prints_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_kbtree"))
        .arg("--help")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("usage: kbtree"));
    assert!(stdout.contains("mv <file> <folder>"));
}

#[test]
fn test_unknown_command_exits_with_usage_error() {
    // No request is made: argument errors are reported before startup
    let output = Command::new(env!("CARGO_BIN_EXE_kbtree"))
        .arg("frobnicate")
        .env("KBTREE_API_URL", "http://127.0.0.1:9")
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown command: frobnicate"));
}
