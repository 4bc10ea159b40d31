//! `release.toml` loading and resolution of the final pipeline configs.
//!
//! Precedence for every setting: command line (or its environment variable),
//! then the config file, then `setup.py` (package name and version only),
//! then the built-in default.
//!
//! Relative `base_dir` and `context` values in a config file are relative to
//! the file's own directory; on the command line they are relative to cwd.

use crate::cli::{ImageArgs, PackageArgs};
use image_builder::{ContainerRuntime, ImageConfig};
use package_builder::{read_setup_py, PackageConfig, PackageMetadata};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "release.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Base directory {path} is not accessible: {source}")]
    BaseDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No {field} configured. {hint}")]
    Missing { field: &'static str, hint: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseFile {
    #[serde(default)]
    pub package: PackageSection,
    #[serde(default)]
    pub image: ImageSection,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    pub project: Option<String>,
    pub version: Option<String>,
    pub base_dir: Option<PathBuf>,
    pub package_dir: Option<PathBuf>,
    pub upload_dir: Option<PathBuf>,
    pub python: Option<String>,
    pub with_wheel: Option<bool>,
    pub create_upload_dir: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSection {
    pub app_name: Option<String>,
    pub version: Option<String>,
    pub registry: Option<String>,
    pub org: Option<String>,
    pub context: Option<PathBuf>,
    pub runtime: Option<ContainerRuntime>,
}

impl ReleaseFile {
    pub fn parse(source: &str, path: &Path) -> ConfigResult<Self> {
        toml::from_str(source).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut file = Self::parse(&source, path)?;
        if let Some(dir) = path.parent() {
            file.rebase(dir);
        }
        Ok(file)
    }

    fn rebase(&mut self, dir: &Path) {
        if let Some(base_dir) = self.package.base_dir.take() {
            self.package.base_dir = Some(dir.join(base_dir));
        }
        if let Some(context) = self.image.context.take() {
            self.image.context = Some(dir.join(context));
        }
    }

    /// Load the explicit file if given, else `release.toml` in `cwd` if it
    /// exists, else an empty configuration.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default = cwd.join(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            debug!(path = %default.display(), "using config file");
            return Self::load(&default);
        }
        Ok(Self::default())
    }
}

pub fn resolve_package(
    args: &PackageArgs,
    file: &PackageSection,
    cwd: &Path,
) -> ConfigResult<PackageConfig> {
    let base_dir = args
        .base_dir
        .clone()
        .or_else(|| file.base_dir.clone())
        .map(|dir| cwd.join(dir))
        .unwrap_or_else(|| cwd.to_path_buf());
    let base_dir = base_dir
        .canonicalize()
        .map_err(|e| ConfigError::BaseDir {
            path: base_dir.clone(),
            source: e,
        })?;

    let mut config = PackageConfig::default().with_base_dir(base_dir);
    if let Some(dir) = args.package_dir.clone().or_else(|| file.package_dir.clone()) {
        config = config.with_package_dir(dir);
    }
    if let Some(dir) = args.upload_dir.clone().or_else(|| file.upload_dir.clone()) {
        config = config.with_upload_dir(dir);
    }
    if let Some(python) = args.python.clone().or_else(|| file.python.clone()) {
        config = config.with_python(python);
    }
    config = config
        .with_wheel(args.with_wheel || file.with_wheel.unwrap_or(false))
        .with_create_upload_dir(args.create_upload_dir || file.create_upload_dir.unwrap_or(false));

    // setup.py only fills gaps; a missing file surfaces later from the pipeline
    let setup_py = config.setup_py();
    let declared = read_setup_py(&setup_py).unwrap_or_else(|e| {
        debug!(error = %e, "no packaging metadata");
        PackageMetadata::default()
    });

    if let Some(project) = args
        .project
        .clone()
        .or_else(|| file.project.clone())
        .or(declared.name)
    {
        config = config.with_project(project);
    }

    config.version = args
        .version
        .clone()
        .or_else(|| file.version.clone())
        .or(declared.version)
        .ok_or_else(|| ConfigError::Missing {
            field: "package version",
            hint: format!(
                "Pass --version, set [package].version in {}, or declare version= in {}.",
                DEFAULT_CONFIG_FILE,
                setup_py.display()
            ),
        })?;

    Ok(config)
}

pub fn resolve_image(args: &ImageArgs, file: &ImageSection, cwd: &Path) -> ConfigResult<ImageConfig> {
    let version = args
        .version
        .clone()
        .or_else(|| file.version.clone())
        .ok_or_else(|| ConfigError::Missing {
            field: "image version",
            hint: format!(
                "Pass --version or set [image].version in {}.",
                DEFAULT_CONFIG_FILE
            ),
        })?;
    let org = args
        .org
        .clone()
        .or_else(|| file.org.clone())
        .ok_or_else(|| ConfigError::Missing {
            field: "registry organisation",
            hint: format!("Pass --org or set [image].org in {}.", DEFAULT_CONFIG_FILE),
        })?;

    let mut config = ImageConfig::new(org, version);
    if let Some(app_name) = args.app_name.clone().or_else(|| file.app_name.clone()) {
        config = config.with_app_name(app_name);
    }
    if let Some(registry) = args.registry.clone().or_else(|| file.registry.clone()) {
        config = config.with_registry(registry);
    }
    if let Some(context) = args.context.clone().or_else(|| file.context.clone()) {
        config = config.with_context(cwd.join(context));
    }
    if let Some(runtime) = args.runtime.or(file.runtime) {
        config = config.with_runtime(runtime);
    }

    Ok(config)
}
