//! Runs the `testkit` binary and checks what it printed.
//!
//! Assertions return `&Self` so they chain:
//!
//! ```ignore
//! CliRunner::new()
//!     .run(&["search", "dell", "--profiles-dir", "profiles"])
//!     .assert_success()
//!     .assert_stdout_contains("dell-latitude");
//! ```

use std::process::{Command, Output, Stdio};

use serde_json::Value;

/// Variables a developer may have exported that would change CLI behavior.
const SCRUBBED_ENV: &[&str] = &[
    "TESTKIT_CONFIG",
    "TESTKIT_FORMAT",
    "NO_COLOR",
    "XDG_CONFIG_HOME",
    "RUST_LOG",
];

/// Launches the compiled `testkit` binary with a scrubbed environment.
///
/// `HOME` points at the system temp dir so no user config file is found.
#[derive(Debug, Default)]
pub struct CliRunner {
    envs: Vec<(String, String)>,
}

impl CliRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable for every run of this runner.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn run(&self, args: &[&str]) -> CliResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_testkit"));
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.env("HOME", std::env::temp_dir())
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .args(args)
            .stdin(Stdio::null());

        let output = cmd
            .output()
            .unwrap_or_else(|e| panic!("failed to launch testkit {args:?}: {e}"));
        CliResult::from_output(args, &output)
    }

    /// Runs with `--robot` in front of `args`.
    #[must_use]
    pub fn run_robot(&self, args: &[&str]) -> CliResult {
        let mut full = vec!["--robot"];
        full.extend_from_slice(args);
        self.run(&full)
    }

    /// Runs with `--robot` in front and `--dry-run` at the end.
    #[must_use]
    pub fn run_robot_dry_run(&self, args: &[&str]) -> CliResult {
        let mut full = vec!["--robot"];
        full.extend_from_slice(args);
        full.push("--dry-run");
        self.run(&full)
    }
}

/// Captured output of one run.
#[derive(Debug, Clone)]
pub struct CliResult {
    pub stdout: String,
    pub stderr: String,
    /// -1 when the process was killed by a signal.
    pub exit_code: i32,
    pub args: Vec<String>,
}

impl CliResult {
    fn from_output(args: &[&str], output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    // === Exit status ===

    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success(),
            "testkit {:?} exited {}\nstderr:\n{}",
            self.args,
            self.exit_code,
            self.stderr
        );
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success(), "testkit {:?} unexpectedly succeeded", self.args);
        self
    }

    pub fn assert_exit_code(&self, expected: i32) -> &Self {
        assert_eq!(
            self.exit_code, expected,
            "testkit {:?}: wrong exit code\nstderr:\n{}",
            self.args, self.stderr
        );
        self
    }

    // === Text output ===

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "stdout is missing {text:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    /// `pattern` is a `regex` pattern; use `(?m)` for line anchors.
    pub fn assert_stdout_matches(&self, pattern: &str) -> &Self {
        let re = regex::Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern {pattern:?}: {e}"));
        assert!(
            re.is_match(&self.stdout),
            "stdout does not match {pattern:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "stderr is missing {text:?}\nstderr:\n{}",
            self.stderr
        );
        self
    }

    // === Robot mode ===

    /// Stdout parsed as one JSON document.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
    }

    /// The robot-mode error object from stderr.
    ///
    /// Log lines share stderr, so this takes the last line that parses as a
    /// JSON object with an `error` key. Run with `--output-format json-compact`
    /// so the error fits on one line.
    #[must_use]
    pub fn stderr_error_json(&self) -> Value {
        self.stderr
            .lines()
            .rev()
            .filter_map(|line| serde_json::from_str::<Value>(line).ok())
            .find(|v| v.get("error").is_some())
            .unwrap_or_else(|| panic!("no JSON error object in stderr:\n{}", self.stderr))
    }

    fn pointer(&self, json_pointer: &str) -> Value {
        let json = self.json();
        json.pointer(json_pointer)
            .cloned()
            .unwrap_or_else(|| panic!("{json_pointer} not found in:\n{json:#}"))
    }

    pub fn assert_json_field(&self, json_pointer: &str, expected: &Value) -> &Self {
        assert_eq!(&self.pointer(json_pointer), expected, "at {json_pointer}");
        self
    }

    pub fn assert_json_field_exists(&self, json_pointer: &str) -> &Self {
        let _ = self.pointer(json_pointer);
        self
    }

    pub fn assert_json_array_len(&self, json_pointer: &str, expected_len: usize) -> &Self {
        let value = self.pointer(json_pointer);
        let items = value
            .as_array()
            .unwrap_or_else(|| panic!("{json_pointer} is not an array: {value}"));
        assert_eq!(items.len(), expected_len, "length of {json_pointer}");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_mentions_package_version() {
        CliRunner::new()
            .run(&["version"])
            .assert_success()
            .assert_stdout_contains(env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_robot_quick_start_names_tool() {
        CliRunner::new()
            .run_robot(&[])
            .assert_success()
            .assert_json_field("/tool", &Value::String("testkit".to_string()));
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        CliRunner::new().run(&["nonexistent-command"]).assert_failure();
    }
}
