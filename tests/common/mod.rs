use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

pub struct ScriptHarness {
    home: TempDir,
}

impl ScriptHarness {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("spendora").expect("binary exists");
        cmd.env("SPENDORA_HOME", self.home())
            .env("SPENDORA_CLI_SCRIPT", "1")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    #[allow(dead_code)]
    pub fn run(&self, script: &str) -> String {
        let output = self
            .command()
            .write_stdin(script.to_string())
            .output()
            .expect("run script CLI");
        assert!(
            output.status.success(),
            "script CLI failed: status={}\nstderr:\n{}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}
