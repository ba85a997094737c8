mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use common::{common, make_library};

/// A command with an empty config file so the user's own config never leaks in.
fn steamsweep(temp_dir: &TempDir) -> Command {
    let config_path = temp_dir.path().join("config.toml");
    if !config_path.exists() {
        fs::write(&config_path, "").unwrap();
    }
    let mut cmd = Command::cargo_bin("steamsweep").unwrap();
    cmd.env("NO_COLOR", "1")
        .arg("--no-pause")
        .arg("--config")
        .arg(&config_path);
    cmd
}

fn search<'a>(cmd: &'a mut Command, root: &Path) -> &'a mut Command {
    cmd.arg("--search-root").arg(root)
}

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("steamsweep").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Steam libraries"))
        .stdout(predicate::str::contains("--search-root"))
        .stdout(predicate::str::contains("--keep"))
        .stdout(predicate::str::contains("--no-pause"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("steamsweep").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("steamsweep"));
}

#[test]
fn test_missing_search_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = steamsweep(&temp_dir);
    search(&mut cmd, &temp_dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_no_library_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = steamsweep(&temp_dir);
    search(&mut cmd, temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Steam"));
}

#[test]
fn test_nothing_to_do() {
    let temp_dir = TempDir::new().unwrap();
    make_library(&temp_dir.path().join("Steam"), &["GameA"], &["GameA"]);

    let mut cmd = steamsweep(&temp_dir);
    search(&mut cmd, temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No orphaned game folders found"));
}

#[test]
fn test_dry_run_lists_orphans() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("Steam");
    make_library(&root, &["GameA", "GameB", "GameC"], &["GameA", "GameC"]);

    let mut cmd = steamsweep(&temp_dir);
    search(&mut cmd, temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("GameB"))
        .stdout(predicate::str::contains("Library:"))
        .stdout(predicate::str::contains("Dry run"));

    assert!(common(&root, "GameB").exists());
}

#[test]
fn test_keep_accepts_comma_separated_and_repeated() {
    let temp_dir = TempDir::new().unwrap();
    make_library(
        &temp_dir.path().join("Steam"),
        &["Tools", "Mods", "Saves"],
        &[],
    );

    let mut cmd = steamsweep(&temp_dir);
    search(&mut cmd, temp_dir.path())
        .arg("--keep")
        .arg("tools,MODS")
        .arg("--keep")
        .arg("Saves")
        .assert()
        .success()
        .stdout(predicate::str::contains("No orphaned game folders found"));
}

#[test]
fn test_keep_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    make_library(&temp_dir.path().join("Steam"), &["Proton"], &[]);
    fs::write(temp_dir.path().join("config.toml"), "keep = [\"Proton\"]\n").unwrap();

    let mut cmd = steamsweep(&temp_dir);
    search(&mut cmd, temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No orphaned game folders found"));
}

#[test]
fn test_without_terminal_confirmation_declines() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("Steam");
    make_library(&root, &["Leftover"], &[]);

    let mut cmd = steamsweep(&temp_dir);
    search(&mut cmd, temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing was moved"));

    assert!(common(&root, "Leftover").exists());
}

#[test]
fn test_corrupt_manifest_reported() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("Steam");
    make_library(&root, &["GameA"], &["GameA"]);
    fs::write(
        root.join("steamapps").join("appmanifest_5.acf"),
        "\"AppState\" { \"appid\" \"5\"",
    )
    .unwrap();

    let mut cmd = steamsweep(&temp_dir);
    search(&mut cmd, temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("appmanifest_5.acf"))
        .stdout(predicate::str::contains("No orphaned game folders found"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    make_library(&temp_dir.path().join("Steam"), &[], &[]);

    let mut cmd = Command::cargo_bin("steamsweep").unwrap();
    cmd.arg("--no-pause")
        .arg("--config")
        .arg(temp_dir.path().join("absent.toml"))
        .arg("--search-root")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config not found"));
}

#[test]
fn test_pause_does_not_block_without_terminal() {
    let temp_dir = TempDir::new().unwrap();
    make_library(&temp_dir.path().join("Steam"), &["GameA"], &["GameA"]);
    fs::write(temp_dir.path().join("config.toml"), "").unwrap();

    let mut cmd = Command::cargo_bin("steamsweep").unwrap();
    cmd.env("NO_COLOR", "1")
        .arg("--config")
        .arg(temp_dir.path().join("config.toml"))
        .arg("--search-root")
        .arg(temp_dir.path())
        .write_stdin("")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Press Enter"));
}

#[test]
fn test_truncated_manifest_keeps_game() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("Steam");
    make_library(&root, &["Portal 2"], &[]);
    fs::write(
        root.join("steamapps").join("appmanifest_620.acf"),
        "\"AppState\"\n{\n\t\"appid\"\t\t\"620\"\n\t\"name\"\t\t\"Portal 2\"\n\t\"installdir\"\t\t\"Portal 2\"\n\t\"InstalledDepots\"\n\t{\n",
    )
    .unwrap();

    let mut cmd = steamsweep(&temp_dir);
    search(&mut cmd, temp_dir.path())
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("No orphaned game folders found"));

    assert!(common(&root, "Portal 2").exists());
}
