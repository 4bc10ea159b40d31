use crate::command::{shell_quote, CommandSpec};
use crate::provider::{CommandRunner, RunnerResult};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

/// Records commands instead of running them.
///
/// Used for `--dry-run`: every command is printed to stdout (prefixed with
/// `+ `, the way `sh -x` shows it) and reported as successful. Side effects
/// the pipelines describe are printed the same way.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    recorded: Mutex<Vec<CommandSpec>>,
    described: Mutex<Vec<String>>,
    echo: bool,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print each command as it is recorded.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Commands seen so far, in invocation order.
    pub fn recorded(&self) -> Vec<CommandSpec> {
        self.recorded
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }

    /// Described side effects seen so far, in order.
    pub fn described(&self) -> Vec<String> {
        self.described
            .lock()
            .map(|actions| actions.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CommandRunner for DryRunRunner {
    async fn run(&self, command: &CommandSpec) -> RunnerResult<()> {
        info!(command = %command, "dry run, not executing");
        if self.echo {
            match command.current_dir() {
                Some(dir) => println!(
                    "+ (cd {} && {})",
                    shell_quote(&dir.display().to_string()),
                    command
                ),
                None => println!("+ {}", command),
            }
        }
        if let Ok(mut commands) = self.recorded.lock() {
            commands.push(command.clone());
        }
        Ok(())
    }

    fn describe(&self, action: &str) {
        info!(action, "dry run, not performing");
        if self.echo {
            println!("+ {}", action);
        }
        if let Ok(mut actions) = self.described.lock() {
            actions.push(action.to_string());
        }
    }

    fn runner_name(&self) -> &'static str {
        "dry-run"
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
