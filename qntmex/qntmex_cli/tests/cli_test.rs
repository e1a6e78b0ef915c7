use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// A `qntmex` invocation rooted at `root`, with a private home directory and
/// no Android SDK variables inherited from the host.
fn qntmex(root: &Path) -> Command {
    let home = root.join("home");
    fs::create_dir_all(&home).unwrap();
    let mut cmd = Command::cargo_bin("qntmex").unwrap();
    cmd.arg("--root")
        .arg(root)
        .env("HOME", &home)
        .env("USERPROFILE", &home)
        .env_remove("ANDROID_HOME")
        .env_remove("ANDROID_SDK_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

fn scaffold(root: &Path, project_dir: &str) -> std::path::PathBuf {
    let android = root.join(project_dir).join("android");
    let wrapper = android.join("gradle").join("wrapper");
    fs::create_dir_all(&wrapper).unwrap();
    fs::write(
        wrapper.join("gradle-wrapper.properties"),
        "distributionUrl=https\\://services.gradle.org/distributions/gradle-8.3-all.zip\nnetworkTimeout=60000\n",
    )
    .unwrap();
    fs::write(
        android.join("gradle.properties"),
        "org.gradle.jvmargs=-Xmx2048m -XX:MaxPermSize=512m\n",
    )
    .unwrap();
    android
}

#[test]
fn test_missing_project_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    qntmex(dir.path())
        .arg("check-gradle")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("qntmex-wallet directory does not exist"));
}

#[test]
fn test_fix_version_pins_wrapper_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let android = scaffold(dir.path(), "qntmex-wallet");
    let wrapper = android.join("gradle/wrapper/gradle-wrapper.properties");

    qntmex(dir.path())
        .arg("fix-version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Gradle version from 8.3 to 7.6"));
    let pinned = fs::read_to_string(&wrapper).unwrap();
    assert!(pinned.contains("gradle-7.6-all.zip"));

    qntmex(dir.path())
        .arg("fix-version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already using Gradle 7.6"));
    assert_eq!(fs::read_to_string(&wrapper).unwrap(), pinned);
}

#[test]
fn test_failed_checks_still_exit_zero() {
    let dir = tempfile::tempdir().unwrap();
    let android = scaffold(dir.path(), "qntmex-wallet");
    fs::write(android.join("gradle.properties"), "org.gradle.daemon=false\n").unwrap();

    qntmex(dir.path())
        .arg("check-gradle")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== QNTMEX Wallet Gradle Configuration Checker ==="))
        .stdout(predicate::str::contains("Next steps:"));
}

#[test]
fn test_json_output_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path(), "qntmex-wallet");

    let output = qntmex(dir.path())
        .args(["check-gradle", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "QNTMEX Wallet Gradle Configuration Checker");
}

#[test]
fn test_config_file_in_root_changes_project_dir() {
    let dir = tempfile::tempdir().unwrap();
    let android = scaffold(dir.path(), "wallet");
    fs::write(dir.path().join("qntmex.toml"), "project_dir = \"wallet\"\n").unwrap();

    qntmex(dir.path()).arg("fix-jvm").assert().success();
    let text = fs::read_to_string(android.join("gradle.properties")).unwrap();
    assert!(!text.contains("MaxPermSize"));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    qntmex(dir.path())
        .args(["--config", "missing.toml", "screens"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}

#[test]
fn test_screens_default_walks_create_path() {
    let dir = tempfile::tempdir().unwrap();
    qntmex(dir.path())
        .arg("screens")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Splash]"))
        .stdout(predicate::str::contains("[CreateWallet]"))
        .stdout(predicate::str::contains("Your Balance: 0.00 ETH"));
}

#[test]
fn test_screens_unhandled_event_fails() {
    let dir = tempfile::tempdir().unwrap();
    qntmex(dir.path())
        .args(["screens", "--event", "create"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Splash does not handle"));
}

#[test]
fn test_screens_rejects_unknown_event_name() {
    let dir = tempfile::tempdir().unwrap();
    qntmex(dir.path())
        .args(["screens", "--event", "fly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown event: fly"));
}

#[test]
fn test_screens_drives_the_import_form() {
    let dir = tempfile::tempdir().unwrap();
    qntmex(dir.path())
        .args(["screens", "--event", "wait", "--event", "next", "--event", "next"])
        .args(["--event", "next", "--event", "import"])
        .args(["--event", "edit:password=hunter22", "--event", "edit:seed=abandon ability"])
        .args(["--event", "toggle-visibility:seed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New Password: ••••••••"))
        .stdout(predicate::str::contains("Seed Phrase: abandon ability"))
        .stdout(predicate::str::contains("edit -> ImportWallet"));
}
