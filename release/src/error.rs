use crate::config::ConfigError;
use image_builder::ImageError;
use package_builder::PackageError;
use runner::RunnerError;
use thiserror::Error;

/// Exit code for configuration problems, matching clap's usage errors.
pub const CONFIG_EXIT_CODE: u8 = 2;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

impl ReleaseError {
    /// Process exit code for this failure.
    ///
    /// A failed external command passes its own exit code through; anything
    /// we detect ourselves before running a command is a usage error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ReleaseError::Config(_) => CONFIG_EXIT_CODE,
            ReleaseError::Package(PackageError::Build(e)) => command_exit_code(e),
            ReleaseError::Package(
                PackageError::InvalidConfig(_)
                | PackageError::Metadata { .. }
                | PackageError::VersionMismatch { .. }
                | PackageError::ProjectMismatch { .. }
                | PackageError::UploadDirMissing(_),
            ) => CONFIG_EXIT_CODE,
            ReleaseError::Package(_) => 1,
            ReleaseError::Image(e) => match e.runner_error() {
                Some(runner) => command_exit_code(runner),
                None => match e {
                    ImageError::InvalidConfig(_) | ImageError::InvalidReference { .. } => {
                        CONFIG_EXIT_CODE
                    }
                    _ => 1,
                },
            },
        }
    }
}

fn command_exit_code(error: &RunnerError) -> u8 {
    error
        .exit_code()
        .and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
        .unwrap_or(1)
}
