use crate::command::CommandSpec;
use crate::provider::{CommandRunner, RunnerError, RunnerResult};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs commands as real child processes.
///
/// The child inherits stdout and stderr so the tools' own progress output
/// reaches the user unchanged. Each call waits for the process to exit.
#[derive(Debug, Default, Clone)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> RunnerResult<()> {
        let line = command.to_string();
        debug!(command = %line, cwd = ?command.current_dir(), "running");

        let status = process(command, Stdio::inherit, Stdio::inherit)
            .status()
            .await.map_err(|e| RunnerError::Spawn {
            command: line.clone(),
            source: e,
        })?;

        if !status.success() {
            warn!(command = %line, code = ?status.code(), "command failed");
            return Err(RunnerError::Failed {
                command: line,
                code: status.code(),
            });
        }

        Ok(())
    }

    async fn probe(&self, command: &CommandSpec) -> bool {
        debug!(command = %command, "probing");
        process(command, Stdio::null, Stdio::null)
            .status()
            .await
            .is_ok_and(|status| status.success())
    }

    fn runner_name(&self) -> &'static str {
        "system"
    }
}

fn process(command: &CommandSpec, stdout: fn() -> Stdio, stderr: fn() -> Stdio) -> Command {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(stdout())
        .stderr(stderr());
    if let Some(dir) = command.current_dir() {
        cmd.current_dir(dir);
    }
    cmd
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_command() {
        let runner = SystemRunner::new();
        let result = runner.run(&CommandSpec::new("true")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failing_command_reports_exit_code() {
        let runner = SystemRunner::new();
        let cmd = CommandSpec::new("sh").args(["-c", "exit 7"]);

        let err = runner.run(&cmd).await.unwrap_err();
        assert_eq!(err.exit_code(), Some(7));
        assert_eq!(err.command(), "sh -c 'exit 7'");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = SystemRunner::new();
        let cmd = CommandSpec::new("radio-release-definitely-not-installed");

        let err = runner.run(&cmd).await.unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_runs_in_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new();
        let cmd = CommandSpec::new("sh")
            .args(["-c", "echo built > marker.txt"])
            .with_current_dir(dir.path());

        runner.run(&cmd).await.unwrap();
        let contents = std::fs::read_to_string(dir.path().join("marker.txt")).unwrap();
        assert_eq!(contents.trim(), "built");
    }

    #[tokio::test]
    async fn test_probe() {
        let runner = SystemRunner::new();
        assert!(runner.probe(&CommandSpec::new("true")).await);
        assert!(!runner.probe(&CommandSpec::new("false")).await);
        assert!(
            !runner
                .probe(&CommandSpec::new("radio-release-definitely-not-installed").arg("--version"))
                .await
        );
    }
}
