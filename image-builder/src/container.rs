use runner::{CommandRunner, CommandSpec};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Container engines that can build and push images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRuntime {
    Podman,
    Docker,
}

impl ContainerRuntime {
    /// Get the command name for this runtime
    pub fn command(&self) -> &'static str {
        match self {
            ContainerRuntime::Podman => "podman",
            ContainerRuntime::Docker => "docker",
        }
    }

    /// `{runtime} --version`, which succeeds only where the engine is installed
    pub fn version_command(&self) -> CommandSpec {
        CommandSpec::new(self.command()).arg("--version")
    }
}

/// Runtime planned with when a dry run names none. Nothing is probed.
pub const DRY_RUN_RUNTIME: ContainerRuntime = ContainerRuntime::Docker;

impl fmt::Display for ContainerRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl FromStr for ContainerRuntime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "podman" => Ok(ContainerRuntime::Podman),
            "docker" => Ok(ContainerRuntime::Docker),
            other => Err(format!(
                "unknown container runtime '{}', expected 'docker' or 'podman'",
                other
            )),
        }
    }
}

/// Detect available container runtime in order of preference
pub async fn detect_runtime(runner: &dyn CommandRunner) -> Option<ContainerRuntime> {
    if runner.is_dry_run() {
        debug!(runtime = %DRY_RUN_RUNTIME, "dry run, not probing for a runtime");
        return Some(DRY_RUN_RUNTIME);
    }
    // Podman first, matching hosts where docker is a podman shim
    for runtime in [ContainerRuntime::Podman, ContainerRuntime::Docker] {
        if runner.probe(&runtime.version_command()).await {
            debug!(%runtime, "detected container runtime");
            return Some(runtime);
        }
    }
    None
}
