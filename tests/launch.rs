#![cfg(unix)]

use std::process::Command;
use tempfile::TempDir;

fn run_cygscript(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cygscript"))
        .args(args)
        .env_remove("CYGSCRIPT_ROOT")
        .env_remove("CYGSCRIPT_SHELL")
        .output()
        .expect("spawn cygscript");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn have_sh() -> bool {
    std::path::Path::new("/bin/sh").is_file()
}

#[test]
fn child_exit_code_becomes_ours() {
    if !have_sh() {
        eprintln!("/bin/sh not found; skipping test");
        return;
    }
    let (_, err, code) = run_cygscript(&["--root", "/", "--shell", "bin/sh", "exit", "17"]);
    assert!(err.is_empty(), "stderr: {err}");
    assert_eq!(code, 17);
}

#[test]
fn arguments_reach_the_shell_verbatim() {
    if !have_sh() {
        eprintln!("/bin/sh not found; skipping test");
        return;
    }
    let (out, err, code) = run_cygscript(&[
        "--root",
        "/",
        "--shell",
        "bin/sh",
        "printf",
        "[%s]",
        "it's \"fine\"",
        "-x",
        "",
    ]);
    assert!(err.is_empty(), "stderr: {err}");
    assert_eq!(out, "[it's \"fine\"][-x][]");
    assert_eq!(code, 0);
}

#[test]
fn missing_shell_reports_os_error() {
    let root = TempDir::new().expect("tempdir");
    let root_arg = root.path().display().to_string();
    let (_, err, code) = run_cygscript(&["--root", &root_arg, "--shell", "bin/sh", "script.sh"]);
    assert_eq!(code, 253, "not-found code sits outside the shell's own 126/127");
    assert!(err.contains("Failed to create process"), "stderr: {err}");
    assert!(err.contains("os error 2"), "stderr: {err}");
}

#[test]
fn missing_windows_script_fails_before_the_shell_runs() {
    if !have_sh() {
        eprintln!("/bin/sh not found; skipping test");
        return;
    }
    let (out, err, code) = run_cygscript(&[
        "--root",
        "/",
        "--shell",
        "bin/sh",
        r"C:\Users\Ann\gone.sh",
        "a",
    ]);
    assert_eq!(code, 254);
    assert!(out.is_empty(), "stdout: {out}");
    assert!(err.contains(r"script not found: C:\Users\Ann\gone.sh"), "stderr: {err}");
    assert!(!err.contains("sh:"), "shell must not run: {err}");
}
