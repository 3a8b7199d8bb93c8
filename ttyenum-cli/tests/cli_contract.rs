//! Integration tests for core CLI contract behavior.

use {
    predicates::prelude::*,
    std::{fs, path::Path},
    tempfile::{TempDir, tempdir},
};

/// Beyond the kernel's pid_max ceiling, so never a live process.
const DEAD_PID: u32 = 0x3FFF_FFFF;

fn cli_cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("ttyenum")
}

/// A command isolated from the user's config files and environment.
fn isolated_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cli_cmd();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("TTYENUM_SYSFS_ROOT")
        .env_remove("TTYENUM_DEV_DIR")
        .env_remove("TTYENUM_LOCK_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// A fake device directory holding serial-looking and unrelated nodes.
fn fake_dev_dir() -> TempDir {
    let dir = tempdir().expect("tempdir should be created");
    for name in ["ttyUSB0", "ttyS1", "ttyACM3", "null", "loop0"] {
        fs::write(dir.path().join(name), b"").expect("create device node");
    }
    dir
}

fn parse_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn help_exits_zero_and_writes_stdout_only() {
    let mut cmd = cli_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ttyenum"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn version_exits_zero_and_writes_stdout_only() {
    let mut cmd = cli_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ttyenum"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn list_devdir_json_reports_matching_nodes() {
    let home = tempdir().expect("tempdir should be created");
    let dev = fake_dev_dir();

    let output = isolated_cmd(home.path())
        .args(["list", "--json", "--strategy", "devdir", "--dev-dir"])
        .arg(dev.path())
        .output()
        .expect("command should execute");
    assert!(output.status.success());

    let parsed = parse_stdout(&output);
    assert_eq!(parsed["ok"], true);
    assert_eq!(parsed["data"]["strategy"], "devdir");
    let names: Vec<&str> = parsed["data"]["ports"]
        .as_array()
        .expect("ports should be an array")
        .iter()
        .filter_map(|p| p["port_name"].as_str())
        .collect();
    if cfg!(any(target_os = "linux", target_os = "android")) {
        assert_eq!(names, ["ttyACM3", "ttyS1", "ttyUSB0"]);
    }
    assert!(!names.contains(&"null"));
    assert!(!names.contains(&"loop0"));
}

#[test]
fn list_devdir_json_empty_directory() {
    let home = tempdir().expect("tempdir should be created");
    let dev = tempdir().expect("tempdir should be created");

    let output = isolated_cmd(home.path())
        .args(["list", "--json", "--strategy", "devdir", "--dev-dir"])
        .arg(dev.path())
        .output()
        .expect("command should execute");
    assert!(output.status.success());
    let parsed = parse_stdout(&output);
    assert_eq!(parsed["data"]["ports"], serde_json::json!([]));
}

#[test]
fn list_human_output_goes_to_stderr() {
    let home = tempdir().expect("tempdir should be created");
    let dev = fake_dev_dir();

    isolated_cmd(home.path())
        .env("NO_COLOR", "1")
        .args(["list", "--strategy", "devdir", "--dev-dir"])
        .arg(dev.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn config_file_selects_strategy_and_patterns() {
    let home = tempdir().expect("tempdir should be created");
    let dev = fake_dev_dir();
    let config = home
        .path()
        .join("custom.toml");
    fs::write(
        &config,
        format!(
            "[scan]\nstrategy = \"devdir\"\ndev_dir = \"{}\"\ndevice_patterns = [\"loop*\"]\n",
            dev.path().display()
        ),
    )
    .expect("write config");

    let output = isolated_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .args(["list", "--json"])
        .output()
        .expect("command should execute");
    assert!(output.status.success());
    let parsed = parse_stdout(&output);
    assert_eq!(parsed["data"]["ports"][0]["port_name"], "loop0");
    assert_eq!(
        parsed["data"]["ports"]
            .as_array()
            .map(Vec::len),
        Some(1)
    );
}

#[test]
fn invalid_local_config_warns_but_succeeds() {
    let home = tempdir().expect("tempdir should be created");
    let dev = tempdir().expect("tempdir should be created");
    fs::write(home.path().join("ttyenum.toml"), "invalid toml [[[").expect("write config");

    let output = isolated_cmd(home.path())
        .args(["list", "--strategy", "devdir", "--dev-dir"])
        .arg(dev.path())
        .output()
        .expect("command should execute");
    assert!(
        output.status.success(),
        "command should succeed despite config warning"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ttyenum.toml"), "should warn about the bad file");
}

#[test]
fn invalid_device_pattern_is_an_error() {
    let home = tempdir().expect("tempdir should be created");
    fs::write(
        home.path().join("ttyenum.toml"),
        "[scan]\ndevice_patterns = [\"tty[S\"]\n",
    )
    .expect("write config");

    isolated_cmd(home.path())
        .args(["list", "--json"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("tty[S"));
}

#[test]
fn info_finds_port_by_device_path() {
    let home = tempdir().expect("tempdir should be created");
    let dev = fake_dev_dir();
    let locks = tempdir().expect("tempdir should be created");
    let device = dev
        .path()
        .join("ttyACM3");

    let output = isolated_cmd(home.path())
        .args(["info", "--json", "--strategy", "devdir", "--dev-dir"])
        .arg(dev.path())
        .arg("--lock-dir")
        .arg(locks.path())
        .arg(&device)
        .output()
        .expect("command should execute");
    if cfg!(any(target_os = "linux", target_os = "android")) {
        assert!(output.status.success());
        let parsed = parse_stdout(&output);
        assert_eq!(parsed["data"]["port_name"], "ttyACM3");
        assert_eq!(parsed["data"]["busy"], false);
        assert_eq!(parsed["data"]["valid"], true);
        assert!(parsed["data"]["vendor_id"].is_null());
    }
}

#[test]
fn info_unknown_port_fails_with_clean_stdout() {
    let home = tempdir().expect("tempdir should be created");
    let dev = tempdir().expect("tempdir should be created");

    isolated_cmd(home.path())
        .args(["info", "--json", "--strategy", "devdir", "--dev-dir"])
        .arg(dev.path())
        .arg("ttyNOPE9")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error").and(predicate::str::contains("ttyNOPE9")));
}

#[test]
fn busy_reports_live_lock() {
    let home = tempdir().expect("tempdir should be created");
    let locks = tempdir().expect("tempdir should be created");
    // The test process itself is alive while the CLI runs
    fs::write(
        locks
            .path()
            .join("LCK..ttyUSB0"),
        format!("{:>10}\n", std::process::id()),
    )
    .expect("write lock");

    let output = isolated_cmd(home.path())
        .arg("--lock-dir")
        .arg(locks.path())
        .args(["busy", "--json", "/dev/ttyUSB0"])
        .output()
        .expect("command should execute");
    assert!(output.status.success());
    let parsed = parse_stdout(&output);
    assert_eq!(parsed["data"]["port_name"], "ttyUSB0");
    assert_eq!(parsed["data"]["busy"], true);
    assert!(
        parsed["data"]["lock_file"]
            .as_str()
            .is_some_and(|p| p.ends_with("LCK..ttyUSB0"))
    );
}

#[test]
fn busy_ignores_stale_lock_and_leaves_it() {
    let home = tempdir().expect("tempdir should be created");
    let locks = tempdir().expect("tempdir should be created");
    let lock_file = locks
        .path()
        .join("LCK..ttyS0");
    fs::write(&lock_file, format!("{DEAD_PID}\n")).expect("write lock");

    let output = isolated_cmd(home.path())
        .arg("--lock-dir")
        .arg(locks.path())
        .args(["busy", "--json", "ttyS0"])
        .output()
        .expect("command should execute");
    assert!(output.status.success());
    let parsed = parse_stdout(&output);
    assert_eq!(parsed["data"]["busy"], false);
    assert!(lock_file.exists(), "stale lock must not be removed");
}

#[test]
fn busy_lock_dir_from_env() {
    let home = tempdir().expect("tempdir should be created");
    let locks = tempdir().expect("tempdir should be created");
    fs::write(
        locks
            .path()
            .join("LCK..ttyACM0"),
        std::process::id().to_string(),
    )
    .expect("write lock");

    isolated_cmd(home.path())
        .env("TTYENUM_LOCK_DIR", locks.path())
        .env("NO_COLOR", "1")
        .args(["busy", "ttyACM0"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("locked"));
}

#[test]
fn baud_rates_json_lists_standard_rates() {
    let home = tempdir().expect("tempdir should be created");
    let output = isolated_cmd(home.path())
        .args(["baud-rates", "--json"])
        .output()
        .expect("command should execute");
    assert!(output.status.success());
    let parsed = parse_stdout(&output);
    let rates = parsed["data"]["baud_rates"]
        .as_array()
        .expect("baud_rates should be an array");
    assert!(rates.contains(&serde_json::json!(9600)));
    assert!(rates.contains(&serde_json::json!(115200)));
    if cfg!(target_os = "linux") {
        assert_eq!(parsed["data"]["platform"], "linux");
    }
}

#[test]
fn completions_bash_exits_zero() {
    let mut cmd = cli_cmd();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .code(0)
        .stdout(predicate::str::contains("ttyenum"));
}

/// Exit code 2: usage error (unknown command, invalid arguments)
#[test]
fn exit_code_two_for_usage_error_unknown_command() {
    let mut cmd = cli_cmd();
    cmd.arg("unknown-command-xyz")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn exit_code_two_for_invalid_strategy() {
    let mut cmd = cli_cmd();
    cmd.args(["list", "--strategy", "everything"])
        .assert()
        .failure()
        .code(2);
}
