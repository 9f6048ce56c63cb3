//! Integration tests for the rk binary
//!
//! Each test writes a settings file and registry into a temp directory and
//! drives the real binary with `--config`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const RK: &str = env!("CARGO_BIN_EXE_rk");

fn setup() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir(dir.join("img")).unwrap();
    fs::write(dir.join("img").join("logo-32.png"), b"32").unwrap();
    fs::write(dir.join("img").join("logo-64.png"), b"64").unwrap();
    fs::write(
        dir.join("kernels.json"),
        r#"{
            "zeta": {"display_name": "Zeta", "language": "python", "interpreter": "python3", "remote_host": "z"},
            "alpha": {"display_name": "Alpha", "language": "python", "interpreter": "python3", "remote_host": "a"}
        }"#,
    )
    .unwrap();

    let config = dir.join("rk.yaml");
    fs::write(
        &config,
        format!(
            "kernels_location: {}\nimg_location: img\nlogo_name: logo-{{size}}.png\nscript: rkscript\n\
             connection_file: \"{{connection_file}}\"\nregistry_path: kernels.json\nkernel_name: template\n\
             display_name: Template\nlanguage: python\ninterpreter: python\nremote_host: localhost\n",
            dir.join("kernels").display()
        ),
    )
    .unwrap();
    (temp_dir, config)
}

fn rk(config: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(RK)
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run rk");
    if let Some(mut pipe) = child.stdin.take() {
        // the child may exit without reading
        let _ = pipe.write_all(stdin.as_bytes());
    }
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_no_subcommand_prints_help() {
    let output = Command::new(RK).output().expect("Failed to run rk");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("install-template"));
    assert!(out.contains("uninstall-all"));
}

#[test]
fn test_list_is_sorted() {
    let (_temp, config) = setup();

    let output = rk(&config, &["list"], "");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "alpha (display name: \"Alpha\")\nzeta (display name: \"Zeta\")\n"
    );
}

#[test]
fn test_install_then_decline_overwrite() {
    let (temp, config) = setup();

    let first = rk(&config, &["install", "alpha"], "");
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    assert!(stdout(&first).contains("Kernel 'alpha' installed"));
    assert!(temp.path().join("kernels/alpha/kernel.json").is_file());

    let second = rk(&config, &["install", "alpha"], "n\n");
    assert!(second.status.success());
    assert!(stdout(&second).contains("already installed"));
    assert!(stdout(&second).contains("left as is"));
}

#[test]
fn test_install_confirm_overwrite() {
    let (temp, config) = setup();
    rk(&config, &["install", "alpha"], "");
    fs::write(temp.path().join("kernels/alpha/extra"), b"x").unwrap();

    let output = rk(&config, &["install", "alpha"], "YeS\n");

    assert!(output.status.success());
    assert!(!temp.path().join("kernels/alpha/extra").exists());
    assert!(temp.path().join("kernels/alpha/kernel.json").is_file());
}

#[test]
fn test_unknown_kernel_exit_code() {
    let (temp, config) = setup();

    let output = rk(&config, &["install", "alpha", "bogus", "nope"], "");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("'bogus' 'nope'"));
    assert!(!temp.path().join("kernels").exists());
}

#[test]
fn test_uninstall_all_empty() {
    let (_temp, config) = setup();

    let output = rk(&config, &["uninstall-all"], "");

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "No kernels to uninstall");
}

#[test]
fn test_template_round_trip() {
    let (temp, config) = setup();

    let install = rk(&config, &["install-template"], "");
    assert!(install.status.success(), "stderr: {}", stderr(&install));
    assert!(temp.path().join("kernels/template/kernel.json").is_file());

    let uninstall = rk(&config, &["uninstall-template"], "");
    assert!(uninstall.status.success());
    assert!(stdout(&uninstall).contains("Template kernel 'template' uninstalled"));

    let again = rk(&config, &["uninstall-template"], "");
    assert_eq!(again.status.code(), Some(1));
    assert!(stderr(&again).contains("not installed"));
}

#[test]
fn test_uninstall_many_summary() {
    let (_temp, config) = setup();
    rk(&config, &["install-all"], "");

    let output = rk(&config, &["uninstall-all"], "");

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Kernels 'alpha' 'zeta' uninstalled");
}

#[test]
fn test_missing_config_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = rk(&temp_dir.path().join("absent.yaml"), &["list"], "");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("settings"));
}
