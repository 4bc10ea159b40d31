use crate::config::ImageConfig;
use crate::container::{detect_runtime, ContainerRuntime};
use crate::tags::ImageTagSet;
use crate::{ImageError, ImageResult};
use runner::{CommandRunner, CommandSpec};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Outcome of a successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub runtime: ContainerRuntime,
    pub local_tag: String,
    /// Remote tags in push order
    pub pushed: Vec<String>,
    pub duration: Duration,
}

pub fn build_command(runtime: ContainerRuntime, config: &ImageConfig) -> CommandSpec {
    CommandSpec::new(runtime.command())
        .args(["build", "--no-cache", "-t"])
        .arg(config.tag_set().local_tag())
        .arg(config.context.display().to_string())
}

pub fn tag_command(runtime: ContainerRuntime, tags: &ImageTagSet, remote: &str) -> CommandSpec {
    CommandSpec::new(runtime.command())
        .arg("tag")
        .arg(tags.local_tag())
        .arg(remote)
}

pub fn push_command(runtime: ContainerRuntime, remote: &str) -> CommandSpec {
    CommandSpec::new(runtime.command()).arg("push").arg(remote)
}

/// Build, tag and push the image described by `config`.
///
/// The build never reuses cached layers. All four tags are applied before
/// the first push. The first failing command ends the run; tags that were
/// already pushed stay pushed.
pub async fn publish_image(
    config: &ImageConfig,
    runner: &dyn CommandRunner,
) -> ImageResult<PublishReport> {
    config.validate()?;
    let runtime = match config.runtime {
        Some(runtime) => runtime,
        None => detect_runtime(runner)
            .await
            .ok_or(ImageError::NoRuntimeAvailable)?,
    };

    let started = Instant::now();
    let tags = config.tag_set();
    let remote_tags = tags.remote_tags();

    info!(image = %tags.local_tag(), %runtime, "building image without cache");
    runner
        .run(&build_command(runtime, config))
        .await
        .map_err(|source| ImageError::BuildFailed {
            image: tags.local_tag(),
            source,
        })?;

    for remote in &remote_tags {
        info!(tag = %remote, "tagging");
        runner
            .run(&tag_command(runtime, &tags, remote))
            .await
            .map_err(|source| ImageError::TagFailed {
                tag: remote.clone(),
                source,
            })?;
    }

    let mut pushed = Vec::with_capacity(remote_tags.len());
    for remote in &remote_tags {
        info!(tag = %remote, "pushing");
        if let Err(source) = runner.run(&push_command(runtime, remote)).await {
            if !pushed.is_empty() {
                warn!(pushed = ?pushed, "registry left with a partial tag set");
            }
            return Err(ImageError::PushFailed {
                tag: remote.clone(),
                pushed,
                source,
            });
        }
        pushed.push(remote.clone());
    }

    Ok(PublishReport {
        runtime,
        local_tag: tags.local_tag(),
        pushed,
        duration: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_lines() {
        let config = ImageConfig::new("org", "0.0.35");
        let tags = config.tag_set();
        let runtime = ContainerRuntime::Docker;

        assert_eq!(
            build_command(runtime, &config).to_string(),
            "docker build --no-cache -t radio:0.0.35 ."
        );
        assert_eq!(
            tag_command(runtime, &tags, "gcr.io/org/radio:latest").to_string(),
            "docker tag radio:0.0.35 gcr.io/org/radio:latest"
        );
        assert_eq!(
            push_command(ContainerRuntime::Podman, "gcr.io/org/radio:latest").to_string(),
            "podman push gcr.io/org/radio:latest"
        );
    }

    #[tokio::test]
    async fn test_invalid_config_runs_nothing() {
        let runner = runner::DryRunRunner::new();
        let config = ImageConfig::new("org", "bad version").with_runtime(ContainerRuntime::Docker);

        let result = publish_image(&config, &runner).await;
        assert!(matches!(result, Err(ImageError::InvalidReference { .. })));
        assert!(runner.recorded().is_empty());
    }
}
