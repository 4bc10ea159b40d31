use crate::{PackageError, PackageResult};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROJECT: &str = "apoweroftrance-radio";
pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_UPLOAD_DIR: &str = "upload";

/// Configuration for one package build.
///
/// `package_dir` and `upload_dir` are relative to `base_dir` unless absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageConfig {
    pub project: String,
    pub version: String,
    pub base_dir: PathBuf,
    pub package_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub python: String,
    /// Also stage the wheel(s) next to the source archive
    pub include_wheel: bool,
    /// Create the upload directory instead of failing when it is missing
    pub create_upload_dir: bool,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            version: String::new(),
            base_dir: PathBuf::from("."),
            package_dir: PathBuf::from("."),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            python: DEFAULT_PYTHON.to_string(),
            include_wheel: false,
            create_upload_dir: false,
        }
    }
}

impl PackageConfig {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_package_dir(mut self, package_dir: impl Into<PathBuf>) -> Self {
        self.package_dir = package_dir.into();
        self
    }

    pub fn with_upload_dir(mut self, upload_dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = upload_dir.into();
        self
    }

    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_wheel(mut self, include_wheel: bool) -> Self {
        self.include_wheel = include_wheel;
        self
    }

    pub fn with_create_upload_dir(mut self, create: bool) -> Self {
        self.create_upload_dir = create;
        self
    }

    /// Directory holding `setup.py`; the build backend runs here.
    pub fn package_root(&self) -> PathBuf {
        self.base_dir.join(&self.package_dir)
    }

    pub fn setup_py(&self) -> PathBuf {
        self.package_root().join("setup.py")
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.package_root().join("dist")
    }

    pub fn upload_path(&self) -> PathBuf {
        self.base_dir.join(&self.upload_dir)
    }

    /// File name of the source archive, e.g. `apoweroftrance-radio-0.0.1.tar.gz`.
    pub fn sdist_name(&self) -> String {
        format!("{}-{}.tar.gz", self.project, self.version)
    }

    pub fn sdist_path(&self) -> PathBuf {
        self.dist_dir().join(self.sdist_name())
    }

    /// Wheel file names use the project name with `-` replaced by `_`.
    pub fn wheel_prefix(&self) -> String {
        format!("{}-{}-", self.project.replace('-', "_"), self.version)
    }

    pub fn validate(&self) -> PackageResult<()> {
        if self.version.trim().is_empty() {
            return Err(PackageError::InvalidConfig(
                "Version cannot be empty".to_string(),
            ));
        }

        if self.version.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(PackageError::InvalidConfig(format!(
                "Version '{}' contains whitespace or '/'",
                self.version
            )));
        }

        if self.project.trim().is_empty() {
            return Err(PackageError::InvalidConfig(
                "Project name cannot be empty".to_string(),
            ));
        }

        if self.python.trim().is_empty() {
            return Err(PackageError::InvalidConfig(
                "Python interpreter cannot be empty".to_string(),
            ));
        }

        if is_escaping(&self.package_dir) {
            return Err(PackageError::InvalidConfig(format!(
                "Package directory {} must not be absolute or contain '..'",
                self.package_dir.display()
            )));
        }

        Ok(())
    }
}

fn is_escaping(path: &Path) -> bool {
    path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PackageConfig::default();
        assert_eq!(config.project, "apoweroftrance-radio");
        assert_eq!(config.python, "python3");
        assert_eq!(config.upload_dir, PathBuf::from("upload"));
        assert!(!config.include_wheel);
        // no version yet
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_derived_paths() {
        let config = PackageConfig::new("0.0.1")
            .with_base_dir("/srv/release")
            .with_package_dir("radio-pkg");

        assert_eq!(config.package_root(), PathBuf::from("/srv/release/radio-pkg"));
        assert_eq!(
            config.setup_py(),
            PathBuf::from("/srv/release/radio-pkg/setup.py")
        );
        assert_eq!(
            config.sdist_path(),
            PathBuf::from("/srv/release/radio-pkg/dist/apoweroftrance-radio-0.0.1.tar.gz")
        );
        assert_eq!(config.upload_path(), PathBuf::from("/srv/release/upload"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sdist_and_wheel_names() {
        let config = PackageConfig::new("0.0.1");
        assert_eq!(config.sdist_name(), "apoweroftrance-radio-0.0.1.tar.gz");
        assert_eq!(config.wheel_prefix(), "apoweroftrance_radio-0.0.1-");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(PackageConfig::new("  ").validate().is_err());
        assert!(PackageConfig::new("0.0.1 beta").validate().is_err());
        assert!(PackageConfig::new("0.0.1")
            .with_project("")
            .validate()
            .is_err());
        assert!(PackageConfig::new("0.0.1")
            .with_python("")
            .validate()
            .is_err());
        assert!(PackageConfig::new("0.0.1")
            .with_package_dir("../elsewhere")
            .validate()
            .is_err());
        assert!(PackageConfig::new("0.0.1")
            .with_package_dir("/abs")
            .validate()
            .is_err());
    }

    #[test]
    fn test_absolute_upload_dir_wins_over_base() {
        let config = PackageConfig::new("0.0.1")
            .with_base_dir("/srv/release")
            .with_upload_dir("/var/upload");
        assert_eq!(config.upload_path(), PathBuf::from("/var/upload"));
    }
}
