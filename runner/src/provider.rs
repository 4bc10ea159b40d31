use crate::command::CommandSpec;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` {}", describe_exit(.code))]
    Failed { command: String, code: Option<i32> },
}

impl RunnerError {
    /// The command line that failed.
    pub fn command(&self) -> &str {
        match self {
            RunnerError::Spawn { command, .. } | RunnerError::Failed { command, .. } => command,
        }
    }

    /// Exit code reported by the failed process, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunnerError::Failed { code, .. } => *code,
            RunnerError::Spawn { .. } => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

pub type RunnerResult<T> = Result<T, RunnerError>;

/// Executes external commands on behalf of a pipeline.
///
/// Implementations must not return `Ok` for a command that did not complete
/// successfully; pipelines rely on that to stop at the first failure.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandSpec) -> RunnerResult<()>;

    fn runner_name(&self) -> &'static str;

    /// Run `command` only to learn whether it succeeds.
    ///
    /// Failures are answers here, not errors.
    async fn probe(&self, command: &CommandSpec) -> bool {
        self.run(command).await.is_ok()
    }

    /// Report a side effect the pipeline performs itself (`mkdir -p ...`,
    /// `cp ...`) rather than through an external command.
    fn describe(&self, _action: &str) {}

    /// True when commands are only recorded. Pipelines then skip their own
    /// filesystem side effects, since the tools never produced anything.
    fn is_dry_run(&self) -> bool {
        false
    }
}
