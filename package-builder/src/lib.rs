//! Python package building for the radio service.
//!
//! Runs the project's build backend (`setup.py sdist bdist_wheel`) and copies
//! the resulting source archive into the upload directory. The pipeline stops
//! at the first failing step: a failed build never reaches the copy.

pub mod artifact;
pub mod builder;
pub mod config;
pub mod metadata;

use runner::RunnerError;
use std::path::PathBuf;
use thiserror::Error;

pub use artifact::{find_wheels, list_archives, stage_file, StagedFile};
pub use builder::{build_command, build_package, PackageReport};
pub use config::PackageConfig;
pub use metadata::{read_setup_py, PackageMetadata};

/// Errors related to package building
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot read packaging metadata from {path}: {reason}")]
    Metadata { path: PathBuf, reason: String },

    #[error("Version mismatch: configured {configured} but {path} declares {declared}")]
    VersionMismatch {
        configured: String,
        declared: String,
        path: PathBuf,
    },

    #[error("Project mismatch: configured {configured} but {path} declares {declared}")]
    ProjectMismatch {
        configured: String,
        declared: String,
        path: PathBuf,
    },

    #[error("Upload directory {0} does not exist")]
    UploadDirMissing(PathBuf),

    #[error(
        "Build backend did not produce {expected}; dist contains: {}",
        describe_found(.found)
    )]
    ArchiveNotFound {
        expected: PathBuf,
        found: Vec<String>,
    },

    #[error("Copied file {copy} does not match {original}")]
    IntegrityMismatch { original: PathBuf, copy: PathBuf },

    #[error("Build backend failed: {0}")]
    Build(#[from] RunnerError),

    #[error("Invalid dist pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_found(found: &[String]) -> String {
    if found.is_empty() {
        "no archives".to_string()
    } else {
        found.join(", ")
    }
}

pub type PackageResult<T> = Result<T, PackageError>;
