use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn file_fling() -> Command {
    let mut cmd = Command::cargo_bin("file-fling").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A temp dir with two small input files
fn inputs() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.csv");
    std::fs::write(&a, "hello world!").unwrap();
    std::fs::write(&b, "x,y\n1,2\n").unwrap();
    (dir, a, b)
}

fn zips_in(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map(|e| e == "zip").unwrap_or(false))
        .collect()
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    file_fling()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("zip archive"))
        .stdout(predicate::str::contains("pack"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("shell"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_version_flag() {
    file_fling()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("file-fling"));
}

// ─── Pack command ────────────────────────────────────────────────────────────

#[test]
fn test_pack_writes_archive() {
    let (dir, a, b) = inputs();
    let out = dir.path().join("out");

    file_fling()
        .arg("pack")
        .arg(&a)
        .arg(&b)
        .arg("-o")
        .arg(&out)
        .args(["--format", "quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file-fling-"))
        .stdout(predicate::str::contains(".zip"));

    let zips = zips_in(&out);
    assert_eq!(zips.len(), 1);
}

#[test]
fn test_pack_json_output() {
    let (dir, a, b) = inputs();
    let out = dir.path().join("out");

    file_fling()
        .arg("pack")
        .arg(&a)
        .arg(&b)
        .arg("-o")
        .arg(&out)
        .args(["--format", "json", "--prefix", "bundle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entries\": 2"))
        .stdout(predicate::str::contains("\"original_bytes\": 20"))
        .stdout(predicate::str::contains("bundle-"));
}

#[test]
fn test_pack_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    file_fling()
        .arg("pack")
        .arg(dir.path().join("nope.txt"))
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot stage"));

    assert!(zips_in(dir.path()).is_empty());
}

#[test]
fn test_pack_duplicate_names_fails() {
    let dir = TempDir::new().unwrap();
    let one = dir.path().join("one");
    let two = dir.path().join("two");
    std::fs::create_dir_all(&one).unwrap();
    std::fs::create_dir_all(&two).unwrap();
    std::fs::write(one.join("same.txt"), "1").unwrap();
    std::fs::write(two.join("same.txt"), "2").unwrap();

    file_fling()
        .arg("pack")
        .arg(one.join("same.txt"))
        .arg(two.join("same.txt"))
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create archive"));

    assert!(zips_in(dir.path()).is_empty());
}

#[test]
fn test_pack_rejects_bad_level() {
    let (dir, a, _) = inputs();

    file_fling()
        .arg("pack")
        .arg(&a)
        .arg("-o")
        .arg(dir.path())
        .args(["--level", "12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("compression_level"));
}

#[test]
fn test_pack_requires_files() {
    file_fling().arg("pack").assert().failure();
}

// ─── List command ────────────────────────────────────────────────────────────

#[test]
fn test_list_json() {
    let (_dir, a, b) = inputs();

    file_fling()
        .arg("list")
        .arg(&a)
        .arg(&b)
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 2"))
        .stdout(predicate::str::contains("\"total_size\": 20"))
        .stdout(predicate::str::contains("\"name\": \"a.txt\""))
        .stdout(predicate::str::contains("text/plain"));
}

#[test]
fn test_list_human() {
    let (_dir, a, _) = inputs();

    file_fling()
        .arg("list")
        .arg(&a)
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("Staged files"))
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("12 B total"));
}

// ─── Shell command ───────────────────────────────────────────────────────────

#[test]
fn test_shell_session_builds_archive() {
    let (dir, a, b) = inputs();
    let out = dir.path().join("out");
    let script = format!("add {} {}\ntotal\nbuild\nquit\n", a.display(), b.display());

    file_fling()
        .arg("shell")
        .arg("-o")
        .arg(&out)
        .arg("--no-color")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files added"))
        .stdout(predicate::str::contains("2 files staged, 20 B total"))
        .stdout(predicate::str::contains("Saved to"));

    assert_eq!(zips_in(&out).len(), 1);
}

#[test]
fn test_shell_build_with_nothing_staged() {
    let dir = TempDir::new().unwrap();

    file_fling()
        .arg("shell")
        .arg("-o")
        .arg(dir.path())
        .write_stdin("build\nclear\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("No files selected"));

    assert!(zips_in(dir.path()).is_empty());
}

// ─── Inspect command ─────────────────────────────────────────────────────────

#[test]
fn test_inspect_packed_archive() {
    let (dir, a, b) = inputs();
    let out = dir.path().join("out");

    file_fling()
        .arg("pack")
        .arg(&a)
        .arg(&b)
        .arg("-o")
        .arg(&out)
        .arg("--quiet")
        .assert()
        .success();

    let archive = zips_in(&out).pop().unwrap();

    file_fling()
        .arg("inspect")
        .arg(&archive)
        .args(["--format", "quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12  a.txt"))
        .stdout(predicate::str::contains("8  b.csv"));
}

#[test]
fn test_inspect_not_a_zip() {
    let (_dir, a, _) = inputs();

    file_fling()
        .arg("inspect")
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read archive"));
}

// ─── Config & completions ────────────────────────────────────────────────────

#[test]
fn test_config_show() {
    let home = TempDir::new().unwrap();

    file_fling()
        .env("HOME", home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compression_level = 6"))
        .stdout(predicate::str::contains("archive_prefix"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();

    file_fling()
        .env("HOME", home.path())
        .args(["config", "set", "compression_level", "9"])
        .assert()
        .success();

    file_fling()
        .env("HOME", home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compression_level = 9"));
}

#[test]
fn test_config_set_unknown_key() {
    let home = TempDir::new().unwrap();

    file_fling()
        .env("HOME", home.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_completions_bash() {
    file_fling()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file-fling"));
}
