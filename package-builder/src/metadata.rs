//! Reading the project name and version declared in `setup.py`.
//!
//! Only literal string arguments to `setup(...)` are recognised, e.g.
//! `name="apoweroftrance-radio"` or `version='0.0.1'`. Values computed at
//! runtime are reported as absent.

use crate::{PackageError, PackageResult};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
}

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*name\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*version\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});

/// Extract metadata from `setup.py` source text.
pub fn parse_setup_py(source: &str) -> PackageMetadata {
    let capture = |re: &Regex| {
        re.captures(source)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    PackageMetadata {
        name: capture(&NAME_RE),
        version: capture(&VERSION_RE),
    }
}

/// Read and parse `setup.py` from disk.
pub fn read_setup_py(path: &Path) -> PackageResult<PackageMetadata> {
    let source = std::fs::read_to_string(path).map_err(|e| PackageError::Metadata {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(parse_setup_py(&source))
}

impl PackageMetadata {
    /// Check the configured project and version against what the metadata declares.
    pub fn check(&self, project: &str, version: &str, path: &Path) -> PackageResult<()> {
        if let Some(declared) = &self.name {
            if declared != project {
                return Err(PackageError::ProjectMismatch {
                    configured: project.to_string(),
                    declared: declared.clone(),
                    path: path.to_path_buf(),
                });
            }
        }

        if let Some(declared) = &self.version {
            if declared != version {
                return Err(PackageError::VersionMismatch {
                    configured: version.to_string(),
                    declared: declared.clone(),
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(())
    }
}
