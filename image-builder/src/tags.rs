/// The four aliases every release is published under, in push order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAlias {
    /// `{version}`
    Version,
    /// `production-{version}`
    ProductionVersion,
    /// `latest`
    Latest,
    /// `production-latest`
    ProductionLatest,
}

impl TagAlias {
    pub const ALL: [TagAlias; 4] = [
        TagAlias::Version,
        TagAlias::ProductionVersion,
        TagAlias::Latest,
        TagAlias::ProductionLatest,
    ];

    pub fn render(&self, version: &str) -> String {
        match self {
            TagAlias::Version => version.to_string(),
            TagAlias::ProductionVersion => format!("production-{}", version),
            TagAlias::Latest => "latest".to_string(),
            TagAlias::ProductionLatest => "production-latest".to_string(),
        }
    }
}

/// Local and remote names for one release of an application image.
///
/// The local image is `{app}:{version}`; every remote tag lives under
/// `{registry}/{org}/{app}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTagSet {
    pub app_name: String,
    pub version: String,
    pub repository: String,
}

impl ImageTagSet {
    pub fn new(registry: &str, org: &str, app_name: &str, version: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            version: version.to_string(),
            repository: format!("{}/{}/{}", registry, org, app_name),
        }
    }

    /// The tag given to the image by the build step.
    pub fn local_tag(&self) -> String {
        format!("{}:{}", self.app_name, self.version)
    }

    pub fn remote_tag(&self, alias: TagAlias) -> String {
        format!("{}:{}", self.repository, alias.render(&self.version))
    }

    /// All fully-qualified remote tags, in the order they are tagged and pushed.
    pub fn remote_tags(&self) -> Vec<String> {
        TagAlias::ALL
            .iter()
            .map(|alias| self.remote_tag(*alias))
            .collect()
    }
}
