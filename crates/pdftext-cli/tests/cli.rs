//! End-to-end tests for the `pdftext` binary.
//!
//! The binary runs in a scratch directory with its config lookups and
//! environment isolated, pointed at fake converter scripts.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn fake_tool(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("fake-textutil");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn pdftext(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pdftext"));
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env("HOME", dir.path())
        .env_remove("PDFTEXT_INPUT")
        .env_remove("PDFTEXT_TOOL")
        .env_remove("PDFTEXT_PROGRAM")
        .env_remove("PDFTEXT_STRICT")
        .env_remove("RUST_LOG");
    cmd
}

fn run(dir: &TempDir, program: &Path, extra: &[&str]) -> Output {
    pdftext(dir)
        .arg("--program")
        .arg(program)
        .args(extra)
        .arg("doc.pdf")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn prints_extracted_text() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(&dir, "printf 'Hello\\n\\nWorld'");

    let output = run(&dir, &tool, &[]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Hello\n\nWorld\n");
}

#[test]
fn tool_failure_prints_error_and_exits_zero() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(&dir, "printf 'bad format' >&2\nexit 1");

    let output = run(&dir, &tool, &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "Error: bad format\n");
}

#[test]
fn missing_tool_prints_launch_failure() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-installed");

    let output = run(&dir, &missing, &[]);
    assert_eq!(output.status.code(), Some(0));
    let printed = stdout(&output);
    assert!(printed.starts_with("Failed to extract PDF: "));
    assert!(printed.trim_end().len() > "Failed to extract PDF:".len());
}

#[test]
fn strict_mode_signals_failure() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let failing = fake_tool(&dir, "printf 'bad format' >&2\nexit 1");

    let output = run(&dir, &failing, &["--strict"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "Error: bad format\n");
}

#[test]
fn strict_mode_exits_zero_on_success() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(&dir, "printf 'all good'");

    let output = run(&dir, &tool, &["--strict"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "all good\n");
}

#[test]
fn strict_mode_signals_launch_failure() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-installed");

    let output = run(&dir, &missing, &["--strict"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Failed to extract PDF: "));
}

#[test]
fn closed_stdout_is_not_an_error() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(
        &dir,
        "i=0\nwhile [ $i -lt 2000 ]; do echo 'some extracted text'; i=$((i+1)); done",
    );

    let mut child = pdftext(&dir)
        .arg("--program")
        .arg(&tool)
        .arg("doc.pdf")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    drop(child.stdout.take());
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("Broken pipe"));
}

#[test]
fn show_config_omits_unparsable_config_file() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".pdftext.toml"), "[extraction\ntool = ").unwrap();

    let output = pdftext(&dir).arg("--show-config").output().unwrap();
    assert!(output.status.success());
    let printed = stdout(&output);
    assert!(printed.contains("Config files:\n  (none)"));
    assert!(!printed.contains(".pdftext.toml"));
}

#[test]
fn empty_env_program_falls_back_to_config_file() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(&dir, "printf 'from config tool'");
    std::fs::write(
        dir.path().join(".pdftext.toml"),
        format!("[extraction]\nprogram = \"{}\"\n", tool.display()),
    )
    .unwrap();

    let output = pdftext(&dir)
        .env("PDFTEXT_PROGRAM", "")
        .arg("doc.pdf")
        .output()
        .unwrap();
    assert_eq!(stdout(&output), "from config tool\n");
}

#[test]
fn cwd_config_file_supplies_program_and_input() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(&dir, "printf '%s' \"$4\"");
    std::fs::write(
        dir.path().join(".pdftext.toml"),
        format!(
            "[extraction]\ninput_path = \"from-config.pdf\"\nprogram = \"{}\"\n",
            tool.display()
        ),
    )
    .unwrap();

    let output = pdftext(&dir).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "from-config.pdf\n");
}

#[test]
fn env_input_overrides_config_file() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(&dir, "printf '%s' \"$4\"");
    std::fs::write(
        dir.path().join(".pdftext.toml"),
        "[extraction]\ninput_path = \"from-config.pdf\"\n",
    )
    .unwrap();

    let output = pdftext(&dir)
        .env("PDFTEXT_INPUT", "from-env.pdf")
        .env("PDFTEXT_PROGRAM", &tool)
        .output()
        .unwrap();
    assert_eq!(stdout(&output), "from-env.pdf\n");
}

#[test]
fn show_config_lists_resolved_settings() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();

    let output = pdftext(&dir)
        .args(["--tool", "pdftotext", "--show-config", "some.pdf"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let printed = stdout(&output);
    assert!(printed.contains("input:   some.pdf"));
    assert!(printed.contains("tool:    pdftotext"));
    assert!(printed.contains("pdftotext (from PATH)"));
}

#[test]
fn unknown_tool_is_rejected_by_argument_parser() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();

    let output = pdftext(&dir).args(["--tool", "ghostscript"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ghostscript"));
}
