use std::process::Command;
use tempfile::tempdir;

fn sales_datagen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sales_datagen"))
}

#[test]
fn test_help_does_not_create_log_directory() {
    let temp_dir = tempdir().unwrap();
    let output = sales_datagen()
        .current_dir(temp_dir.path())
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!temp_dir.path().join("logs").exists());
}

#[test]
fn test_failure_is_reported_once_with_nonzero_exit() {
    let temp_dir = tempdir().unwrap();
    let output = sales_datagen()
        .current_dir(temp_dir.path())
        .env("NO_COLOR", "1")
        .args(["generate", "--input", "absent.txt"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Failed to open metadata file").count(), 1, "stderr: {}", stderr);
    assert!(!temp_dir.path().join("sales_data.csv").exists());
}

#[test]
fn test_generate_writes_both_files() {
    let temp_dir = tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("metadata.txt"),
        "C1|2020-01-01\nC2|2025-01-01\nP1|Widget|SpecA|100|CODE1\n",
    )
    .unwrap();

    let output = sales_datagen()
        .current_dir(temp_dir.path())
        .args(["generate", "--total-target", "10", "--seed", "4"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let sales = std::fs::read_to_string(temp_dir.path().join("sales_data.csv")).unwrap();
    let inventory = std::fs::read_to_string(temp_dir.path().join("inventory_logs_data.csv")).unwrap();
    assert_eq!(sales.lines().count(), 10);
    assert_eq!(inventory.lines().count(), 10);
}
