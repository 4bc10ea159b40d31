pub mod cli;
pub mod config;
pub mod error;

pub use cli::{Cli, Commands, ImageArgs, PackageArgs};
pub use config::{resolve_image, resolve_package, ConfigError, ReleaseFile};
pub use error::ReleaseError;
