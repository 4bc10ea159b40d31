use crate::artifact::{find_wheels, list_archives, stage_file, StagedFile};
use crate::config::PackageConfig;
use crate::metadata::read_setup_py;
use crate::{PackageError, PackageResult};
use runner::{shell_quote, CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a package build left in the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    /// Staged source archive, or `None` in dry-run mode
    pub archive: Option<StagedFile>,
    pub wheels: Vec<StagedFile>,
    pub upload_dir: PathBuf,
}

/// The build backend invocation for `config`.
pub fn build_command(config: &PackageConfig) -> CommandSpec {
    CommandSpec::new(&config.python)
        .args(["setup.py", "sdist", "bdist_wheel"])
        .with_current_dir(config.package_root())
}

/// Build the sdist and wheel, then stage the source archive for upload.
///
/// Steps run in order and the first failure is returned: metadata check,
/// upload directory check, build backend, archive lookup, copy. An archive
/// of the expected name left over from an earlier build is removed first, so
/// only what this build produced can be staged.
pub async fn build_package(
    config: &PackageConfig,
    runner: &dyn CommandRunner,
) -> PackageResult<PackageReport> {
    config.validate()?;
    let dry_run = runner.is_dry_run();

    let setup_py = config.setup_py();
    let metadata = read_setup_py(&setup_py)?;
    metadata.check(&config.project, &config.version, &setup_py)?;

    let upload_dir = config.upload_path();
    if !upload_dir.is_dir() {
        if !config.create_upload_dir {
            return Err(PackageError::UploadDirMissing(upload_dir));
        }
        runner.describe(&format!("mkdir -p {}", quoted(&upload_dir)));
        if !dry_run {
            warn!(path = %upload_dir.display(), "creating missing upload directory");
            std::fs::create_dir_all(&upload_dir)?;
        }
    }

    let sdist = config.sdist_path();
    if sdist.is_file() {
        runner.describe(&format!("rm -f {}", quoted(&sdist)));
        if !dry_run {
            info!(path = %sdist.display(), "removing archive from an earlier build");
            std::fs::remove_file(&sdist)?;
        }
    }

    info!(
        project = %config.project,
        version = %config.version,
        dir = %config.package_root().display(),
        "building sdist and wheel"
    );
    runner.run(&build_command(config)).await?;

    let copy = format!("cp {} {}", quoted(&sdist), quoted(&upload_dir));
    if dry_run {
        runner.describe(&copy);
        return Ok(PackageReport {
            archive: None,
            wheels: Vec::new(),
            upload_dir,
        });
    }

    if !sdist.is_file() {
        return Err(PackageError::ArchiveNotFound {
            expected: sdist,
            found: list_archives(&config.dist_dir())?,
        });
    }
    runner.describe(&copy);
    let archive = stage_file(&sdist, &upload_dir)?;

    let mut wheels = Vec::new();
    if config.include_wheel {
        let found = find_wheels(&config.dist_dir(), &config.wheel_prefix())?;
        if found.is_empty() {
            warn!(prefix = %config.wheel_prefix(), "no wheel found in dist");
        }
        for wheel in found {
            wheels.push(stage_file(&wheel, &upload_dir)?);
        }
    }

    Ok(PackageReport {
        archive: Some(archive),
        wheels,
        upload_dir,
    })
}

fn quoted(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command() {
        let config = PackageConfig::new("0.0.1")
            .with_base_dir("/srv")
            .with_package_dir("pkg")
            .with_python("python3.8");
        let cmd = build_command(&config);

        assert_eq!(cmd.to_string(), "python3.8 setup.py sdist bdist_wheel");
        assert_eq!(cmd.current_dir(), Some(Path::new("/srv/pkg")));
    }
}
