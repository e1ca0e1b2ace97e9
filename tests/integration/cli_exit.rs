//! Exit status and final diagnostic of `sentinel run`.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

#[test]
fn test_exhausted_run_reports_once_and_exits_1() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    // No gpio tree: every attempt fails to configure the line.
    fs::write(
        &path,
        format!(
            "[switch]\npin = 17\n\n[sensor]\ngpio_root = {:?}\n\n[supervisor]\nmax_attempts = 2\nrestart_delay_ms = 0\n",
            temp.path().join("missing").display().to_string()
        ),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_sentinel"))
        .args(["run", "--config"])
        .arg(&path)
        .env("RUST_LOG", "off")
        .env("NO_COLOR", "1")
        .env_remove("SENTINEL_PIN")
        .env_remove("PIN")
        .env_remove("SENTINEL_TIMEZONE")
        .env_remove("TIMEZONE")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Monitoring stopped:").count(), 1, "{stderr}");
    assert_eq!(stderr.matches("crashed 2 times").count(), 1, "{stderr}");
    assert!(!stderr.contains("Error:"), "{stderr}");
}
