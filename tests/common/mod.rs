//! Shared test infrastructure for integration tests.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Isolated environment for running the compass binary.
///
/// Each fixture owns an empty config file so a developer's real config or
/// credential never leaks into a test run.
pub struct TestFixture {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

impl TestFixture {
    pub fn setup() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "{}").expect("write empty config");
        Self { dir, config_path }
    }

    /// Write a scratch file inside the fixture directory.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Base command with a scrubbed environment and no credential.
    pub fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_compass"));
        command
            .env_remove("GEMINI_API_KEY")
            .env_remove("COMPASS_GEMINI_ENDPOINT")
            .env("COMPASS_CONFIG", &self.config_path)
            .env("COMPASS_LOG", "off");
        command
    }

    /// Run with the given args and stdin contents.
    pub fn run(&self, command: &mut Command, stdin: &str) -> Output {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn compass");
        child
            .stdin
            .take()
            .expect("stdin handle")
            .write_all(stdin.as_bytes())
            .expect("write stdin");
        child.wait_with_output().expect("wait for compass")
    }
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
