use crate::container::ContainerRuntime;
use crate::tags::{ImageTagSet, TagAlias};
use crate::{ImageError, ImageResult};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

pub const DEFAULT_APP_NAME: &str = "radio";
pub const DEFAULT_REGISTRY: &str = "gcr.io";

// Docker reference grammar: tags are [A-Za-z0-9_.-], at most 128 chars,
// repository path components are lowercase alphanumerics with separators.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("valid regex"));

static PATH_COMPONENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*$").expect("valid regex")
});

static REGISTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9.-]*[A-Za-z0-9])?(:[0-9]+)?$").expect("valid regex")
});

/// Configuration for publishing one application image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub app_name: String,
    pub version: String,
    /// Registry host, e.g. `gcr.io`
    pub registry: String,
    /// Namespace under the registry (the GCP project for gcr.io)
    pub org: String,
    /// Build context passed to `build`
    pub context: PathBuf,
    /// `None` means detect at publish time
    pub runtime: Option<ContainerRuntime>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            version: String::new(),
            registry: DEFAULT_REGISTRY.to_string(),
            org: String::new(),
            context: PathBuf::from("."),
            runtime: None,
        }
    }
}

impl ImageConfig {
    pub fn new(org: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = registry.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_runtime(mut self, runtime: ContainerRuntime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn tag_set(&self) -> ImageTagSet {
        ImageTagSet::new(&self.registry, &self.org, &self.app_name, &self.version)
    }

    pub fn validate(&self) -> ImageResult<()> {
        if self.version.is_empty() {
            return Err(ImageError::InvalidConfig(
                "Version cannot be empty".to_string(),
            ));
        }

        if self.org.is_empty() {
            return Err(ImageError::InvalidConfig(
                "Registry organisation cannot be empty".to_string(),
            ));
        }

        if !REGISTRY_RE.is_match(&self.registry) {
            return Err(ImageError::InvalidReference {
                reference: self.registry.clone(),
                reason: "not a valid registry host".to_string(),
            });
        }

        for component in self.org.split('/').chain(std::iter::once(self.app_name.as_str())) {
            if !PATH_COMPONENT_RE.is_match(component) {
                return Err(ImageError::InvalidReference {
                    reference: format!("{}/{}", self.org, self.app_name),
                    reason: format!(
                        "'{}' must be lowercase letters and digits separated by '.', '_' or '-'",
                        component
                    ),
                });
            }
        }

        // the longest alias must still be a legal tag
        for alias in [TagAlias::Version, TagAlias::ProductionVersion] {
            let tag = alias.render(&self.version);
            if !TAG_RE.is_match(&tag) {
                return Err(ImageError::InvalidReference {
                    reference: tag,
                    reason: "tags use [A-Za-z0-9_.-], at most 128 characters, and cannot start with '.' or '-'"
                        .to_string(),
                });
            }
        }

        Ok(())
    }
}
