//! CLI integration tests.
//!
//! These tests exercise the CLI commands end-to-end against a temporary
//! data directory.

use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// A sandboxed home and data directory for one test.
struct Env {
    home: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> std::path::PathBuf {
        self.home.path().join("data")
    }

    fn command(&self, args: &[&str]) -> Command {
        let home = self.home.path();
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_codeplayground"));
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .args(args)
            .current_dir(home)
            .env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join("config"))
            .env("XDG_STATE_HOME", home.join("state"))
            .env("XDG_DATA_HOME", home.join("share"))
            .env_remove("CODEPLAYGROUND_CONFIG_CONTENT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute command")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn command");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
        child.wait_with_output().expect("Failed to wait for command")
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_version_command() {
    let env = Env::new();
    let stdout = env.run_ok(&["version"]);
    assert!(stdout.contains("codeplayground"));
}

#[test]
fn test_help_command() {
    let env = Env::new();
    let stdout = env.run_ok(&["--help"]);
    assert!(stdout.contains("Code playground"));
    assert!(stdout.contains("--data-dir"));
    assert!(stdout.contains("--shared"));
}

#[test]
fn test_fresh_store_has_default_project() {
    let env = Env::new();
    let stdout = env.run_ok(&["ls"]);
    assert!(stdout.contains("- index.html (file)"));
    assert!(stdout.contains("- style.css (file)"));
    assert!(stdout.contains("- script.js (file)"));
    assert!(env.data_dir().join("store").join("codeplayground_autosave.json").exists());
}

#[test]
fn test_edit_tree_and_read_back() {
    let env = Env::new();
    env.run_ok(&["new", "/src", "--folder"]);
    env.run_ok(&["new", "/src/app.py"]);
    env.run_ok(&["write", "/src/app.py", "--content", "print('hello')"]);

    assert_eq!(env.run_ok(&["cat", "/src/app.py"]), "print('hello')\n");
    assert!(env.run_ok(&["tree"]).starts_with("src/\n  app.py\n"));

    env.run_ok(&["rename", "/src", "lib"]);
    assert_eq!(env.run_ok(&["cat", "/lib/app.py"]), "print('hello')\n");

    env.run_ok(&["mv", "/lib/app.py", "/"]);
    assert_eq!(env.run_ok(&["cat", "app.py"]), "print('hello')\n");

    env.run_ok(&["rm", "/lib"]);
    assert!(!env.run_ok(&["tree"]).contains("lib/"));
}

#[test]
fn test_cat_unknown_file_fails() {
    let env = Env::new();
    let output = env.run(&["cat", "missing.txt"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("missing.txt"));
}

#[test]
fn test_run_python_file() {
    let env = Env::new();
    env.run_ok(&["new", "main.py"]);
    env.run_ok(&["write", "main.py", "--content", "print(1)"]);

    let stdout = env.run_ok(&["run", "main.py"]);
    assert!(stdout.contains("> Running main.py (python)..."));
    assert!(stdout.contains("Python execution simulated. (Actual execution not supported)"));
    assert!(stdout.contains("--- End Output ---"));
}

#[test]
fn test_run_web_file_prints_preview() {
    let env = Env::new();
    let stdout = env.run_ok(&["run", "index.html"]);
    assert!(stdout.contains("<html"));
}

#[test]
fn test_run_javascript_natively() {
    let env = Env::new();
    env.run_ok(&["write", "script.js", "--content", "console.log(\"hi from js\")"]);

    let stdout = env.run_ok(&["run", "--native", "script.js"]);
    assert!(stdout.contains("hi from js"));
}

#[test]
fn test_write_from_stdin() {
    let env = Env::new();
    let output = env.run_with_stdin(&["write", "style.css"], "body {}\n");
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(env.run_ok(&["cat", "style.css"]), "body {}\n\n");
}

#[test]
fn test_export_import_between_stores() {
    let source = Env::new();
    source.run_ok(&["new", "notes.md"]);
    source.run_ok(&["theme", "dracula"]);
    let export_path = source.home.path().join("project.json");
    source.run_ok(&["export", "-o", export_path.to_str().unwrap()]);

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(exported["theme"], "dracula");
    assert_eq!(exported["metadata"]["name"], "CodePlayground Project");

    let target = Env::new();
    target.run_ok(&["import", export_path.to_str().unwrap()]);
    assert!(target.run_ok(&["ls"]).contains("- notes.md (file)"));
}

#[test]
fn test_import_invalid_file_fails() {
    let env = Env::new();
    let bad = env.home.path().join("bad.json");
    std::fs::write(&bad, r#"{"theme":"dark"}"#).unwrap();

    let output = env.run(&["import", bad.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Import failed: Invalid project file format"));
    assert!(env.run_ok(&["ls"]).contains("- index.html (file)"));
}

#[test]
fn test_save_version_requires_login() {
    let env = Env::new();
    let output = env.run(&["save-version"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Login required"));
}

#[test]
fn test_versions_for_logged_in_user() {
    let env = Env::new();
    assert!(env.run_ok(&["login", "ada"]).contains("Logged in as ada"));

    env.run_ok(&["write", "script.js", "--content", "v1"]);
    env.run_ok(&["save-version"]);
    env.run_ok(&["write", "script.js", "--content", "v2"]);
    env.run_ok(&["save-version"]);

    let history = env.run_ok(&["history"]);
    assert_eq!(history.lines().count(), 2);
    assert!(history.starts_with("  0  "));

    env.run_ok(&["restore", "1"]);
    assert_eq!(env.run_ok(&["cat", "script.js"]), "v1\n");

    env.run_ok(&["logout"]);
    assert!(!env.run(&["history"]).status.success());
}

#[test]
fn test_share_and_open_shared() {
    let env = Env::new();
    env.run_ok(&["write", "style.css", "--content", "h1 { color: teal; }"]);
    let stdout = env.run_ok(&["share"]);
    let id = stdout
        .lines()
        .find_map(|l| l.strip_prefix("Shared id: "))
        .expect("share prints the id")
        .to_string();
    assert!(stdout.contains(&format!("?sharedId={id}")));

    let output = env.run(&["--shared", &id, "cat", "style.css"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "h1 { color: teal; }\n");
    assert!(stderr(&output).contains("Shared project loaded"));
}

#[test]
fn test_missing_shared_project_falls_back() {
    let env = Env::new();
    let output = env.run(&["--shared", "no-such-id", "ls"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("Shared project not found"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("- index.html (file)"));
}

#[test]
fn test_pull_outside_shared_mode_fails() {
    let env = Env::new();
    let output = env.run(&["pull"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Not in shared mode"));
}

#[test]
fn test_extension_toggle() {
    let env = Env::new();
    assert!(env.run_ok(&["ext", "toggle", "prettier"]).contains("Enabled prettier"));
    assert!(env.run_ok(&["ext", "list"]).contains("[x] prettier"));
    assert!(!env.run(&["ext", "toggle", "nope"]).status.success());
}

#[test]
fn test_settings_set_and_get() {
    let env = Env::new();
    assert_eq!(env.run_ok(&["settings", "get", "fontSize"]), "14\n");
    env.run_ok(&["settings", "set", "fontSize", "18"]);
    assert_eq!(env.run_ok(&["settings", "get", "fontSize"]), "18\n");
}

#[test]
fn test_config_command() {
    let env = Env::new();
    let stdout = env.run_ok(&["config"]);
    assert!(stdout.contains("Configuration sources:"));
    assert!(stdout.contains("Current configuration:"));
}

#[test]
fn test_project_config_is_loaded() {
    let env = Env::new();
    std::fs::write(
        env.home.path().join("codeplayground.json"),
        r#"{ "share_origin": "https://play.example" }"#,
    )
    .unwrap();

    let stdout = env.run_ok(&["share"]);
    assert!(stdout.contains("https://play.example?sharedId="));
}

#[test]
fn test_shell_session() {
    let env = Env::new();
    let output = env.run_with_stdin(&["shell"], "ls\ncat missing\nexit\n");
    assert!(output.status.success(), "{}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to CodePlayground Terminal!"));
    assert!(stdout.contains("- index.html (file)"));
    assert!(stdout.contains("File not found: missing"));
}
