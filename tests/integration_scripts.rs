use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use stackish::{compile_file, execute_with_io, ErrorKind, Halt};

// Helper to get absolute path from manifest dir
fn manifest_path(rel: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join(rel)
}

// Helper to run a script through the library and capture what it printed
fn run_script(rel: &str, fold: bool, input: &str) -> (Halt, String) {
    let path = manifest_path(rel);
    let code = compile_file(path.to_str().unwrap(), fold).unwrap();
    let mut output = Vec::new();

    let halt = execute_with_io(code, input.as_bytes(), &mut output).unwrap();

    (halt, String::from_utf8(output).unwrap())
}

// Helper to run the built binary with a script and some stdin
fn run_binary(args: &[&str], input: &str) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stackish"))
        .args(args)
        .env_remove("STACKISH_NO_FOLD")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run interpreter");

    child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

const HELLO_OUTPUT: &str = "Hello world!\n2 + 3 = 5\n10 / 3 = 3\nDepth: 0\n";

#[test]
fn hello_script() {
    for fold in [false, true] {
        let (halt, output) = run_script("scripts/hello.sk", fold, "");

        assert_eq!(halt, Halt::Completed);
        assert_eq!(output, HELLO_OUTPUT);
    }
}

#[test]
fn double_script_reads_input() {
    let (_, output) = run_script("scripts/double.sk", true, "21\n");

    assert_eq!(output, "Enter a number: 42\n");
}

#[test]
fn select_script_exits_early() {
    let (halt, output) = run_script("scripts/select.sk", true, "");

    assert_eq!(halt, Halt::Exited);
    assert_eq!(output, "same\ndifferent\n0\nearly\n");
}

#[test]
fn missing_script_is_an_io_error() {
    let path = manifest_path("scripts/missing.sk");
    let error = compile_file(path.to_str().unwrap(), true).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Io);
}

#[test]
fn binary_runs_a_script() {
    let script = manifest_path("scripts/hello.sk");
    let output = run_binary(&[script.to_str().unwrap()], "");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), HELLO_OUTPUT);
}

#[test]
fn binary_reports_script_errors() {
    let script = manifest_path("scripts/double.sk");
    let output = run_binary(&["--no-fold", script.to_str().unwrap()], "twelve\n");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cast error"));
}

#[test]
fn binary_repl_evaluates_lines() {
    let output = run_binary(&[], "2 3 + println\n+\n\"still here\" println\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("5\n"));
    assert!(stdout.contains("still here\n"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("stack underflow"));
}

#[test]
fn binary_rejects_unknown_options() {
    let output = run_binary(&["--bogus"], "");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: stackish"));
}
