//! Container image publishing for the radio service
//!
//! Builds the application image without cache, tags it under the four
//! release aliases and pushes every alias to the registry. Each step must
//! succeed before the next one starts.

pub mod config;
pub mod container;
pub mod publisher;
pub mod tags;

use runner::RunnerError;
use thiserror::Error;

pub use config::ImageConfig;
pub use container::{detect_runtime, ContainerRuntime, DRY_RUN_RUNTIME};
pub use publisher::{publish_image, PublishReport};
pub use tags::{ImageTagSet, TagAlias};

/// Errors related to image publishing
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("No container runtime available. Please install Docker or Podman.")]
    NoRuntimeAvailable,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid image reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("Build of {image} failed: {source}")]
    BuildFailed {
        image: String,
        #[source]
        source: RunnerError,
    },

    #[error("Tagging {tag} failed: {source}")]
    TagFailed {
        tag: String,
        #[source]
        source: RunnerError,
    },

    #[error("Push of {tag} failed after {} of 4 tags were pushed: {source}", .pushed.len())]
    PushFailed {
        tag: String,
        pushed: Vec<String>,
        #[source]
        source: RunnerError,
    },
}

impl ImageError {
    /// The failed external command, if this error came from one.
    pub fn runner_error(&self) -> Option<&RunnerError> {
        match self {
            ImageError::BuildFailed { source, .. }
            | ImageError::TagFailed { source, .. }
            | ImageError::PushFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type ImageResult<T> = Result<T, ImageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ImageError::NoRuntimeAvailable;
        assert!(error.to_string().contains("No container runtime available"));

        let error = ImageError::PushFailed {
            tag: "gcr.io/org/radio:latest".to_string(),
            pushed: vec![
                "gcr.io/org/radio:0.0.35".to_string(),
                "gcr.io/org/radio:production-0.0.35".to_string(),
            ],
            source: RunnerError::Failed {
                command: "docker push gcr.io/org/radio:latest".to_string(),
                code: Some(1),
            },
        };
        let msg = error.to_string();
        assert!(msg.contains("gcr.io/org/radio:latest"));
        assert!(msg.contains("after 2 of 4"));
    }

    #[test]
    fn test_runner_error_accessor() {
        let error = ImageError::BuildFailed {
            image: "radio:0.0.35".to_string(),
            source: RunnerError::Failed {
                command: "docker build".to_string(),
                code: Some(125),
            },
        };
        assert_eq!(error.runner_error().and_then(|e| e.exit_code()), Some(125));
        assert!(ImageError::NoRuntimeAvailable.runner_error().is_none());
    }
}
