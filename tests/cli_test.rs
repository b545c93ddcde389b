#![cfg(all(unix, feature = "cli"))]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

// Serializes stub creation against spawns from other test threads (ETXTBSY).
static STUB_LOCK: Mutex<()> = Mutex::new(());

fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

fn write_stub(dir: &Path, exit_code: i32) -> PathBuf {
    let path = dir.join("launchctl");
    write_file(
        &path,
        &format!(
            "#!/bin/sh\nif [ \"$1\" = print ]; then printf '%s = {{\\n\\tstate = running\\n\\tpid = 9\\n}}\\n' \"$2\"; fi\n[ {code} -ne 0 ] && echo 'Could not find service' >&2\nexit {code}\n",
            code = exit_code
        ),
    );
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_config(dir: &Path, stub: &Path) -> PathBuf {
    let path = dir.join("service.toml");
    write_file(
        &path,
        &format!(
            r#"
[service]
name = "com.example.agent"
domain = "gui/501"
definition_dir = "{defs}"
launchctl_path = "{stub}"

[program]
arguments = ["/usr/local/bin/agent", "--serve"]
keep_alive = true
"#,
            defs = dir.join("LaunchAgents").display(),
            stub = stub.display(),
        ),
    );
    path
}

fn launchd_svc(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_launchd-svc"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_definition_subcommand_renders_plist() {
    let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), Path::new("/usr/bin/false"));

    let output = launchd_svc(&["--config", config.to_str().unwrap(), "definition"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("<string>com.example.agent</string>"));
    assert!(stdout.contains("<key>KeepAlive</key>\n\t<true/>"));
}

#[test]
fn test_status_json_and_not_loaded() {
    let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();

    let loaded = TempDir::new().unwrap();
    let stub = write_stub(loaded.path(), 0);
    let config = write_config(dir.path(), &stub);
    let output = launchd_svc(&["-c", config.to_str().unwrap(), "status", "--json"]);
    assert!(output.status.success());
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["specifier"], "gui/501/com.example.agent");
    assert_eq!(status["pid"], 9);

    let missing = TempDir::new().unwrap();
    let stub = write_stub(missing.path(), 113);
    let config = write_config(dir.path(), &stub);
    let output = launchd_svc(&["-c", config.to_str().unwrap(), "status"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "gui/501/com.example.agent: not loaded"
    );
}

#[test]
fn test_launchctl_failure_exit_code() {
    let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), 113);
    let config = write_config(dir.path(), &stub);

    let output = launchd_svc(&["-c", config.to_str().unwrap(), "start"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not find service"));
}

#[test]
fn test_invalid_name_is_rejected() {
    let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let output = launchd_svc(&["--name", "bad name", "start"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_launchctl_exits_critical() {
    let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), Path::new("/nonexistent/launchctl"));

    let output = launchd_svc(&["-c", config.to_str().unwrap(), "stop"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("/nonexistent/launchctl"));
}

#[test]
fn test_missing_config_file_exits_critical() {
    let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    let output = launchd_svc(&["-c", missing.to_str().unwrap(), "start"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_install_then_uninstall_with_json_logs() {
    let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    let stub = write_stub(bin.path(), 0);
    let config = write_config(dir.path(), &stub);
    let plist = dir.path().join("LaunchAgents/com.example.agent.plist");

    let output = Command::new(env!("CARGO_BIN_EXE_launchd-svc"))
        .args(["--log-json", "-c", config.to_str().unwrap(), "install"])
        .env("RUST_LOG", "launchd_svc=info")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(plist.exists());
    assert!(std::fs::read_to_string(&plist).unwrap().contains("<string>--serve</string>"));

    let logs = String::from_utf8_lossy(&output.stderr);
    let first = logs.lines().find(|l| !l.trim().is_empty()).unwrap();
    let record: serde_json::Value = serde_json::from_str(first).unwrap();
    assert!(record["fields"]["message"].as_str().unwrap().contains("com.example.agent"));

    let output = launchd_svc(&["-c", config.to_str().unwrap(), "uninstall", "--keep-definition"]);
    assert!(output.status.success());
    assert!(plist.exists());

    let output = launchd_svc(&["-c", config.to_str().unwrap(), "uninstall"]);
    assert!(output.status.success());
    assert!(!plist.exists());
}
