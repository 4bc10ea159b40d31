use clap::{Args, Parser, Subcommand};
use image_builder::ContainerRuntime;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "radio-release")]
#[command(about = "Package and publish the A Power of Trance radio service")]
pub struct Cli {
    /// Configuration file (defaults to ./release.toml when present)
    #[arg(long, global = true, env = "RADIO_RELEASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the commands that would run without executing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the sdist and wheel and copy the archive to the upload directory
    Package(PackageArgs),
    /// Build the container image, tag it and push every tag
    Image(ImageArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct PackageArgs {
    /// Package version (defaults to the version declared in setup.py)
    #[arg(long, env = "RADIO_RELEASE_PACKAGE_VERSION")]
    pub version: Option<String>,

    /// Distribution name used in the archive file name
    #[arg(long, env = "RADIO_RELEASE_PROJECT")]
    pub project: Option<String>,

    /// Directory everything else is relative to (defaults to the current directory)
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Subdirectory holding setup.py
    #[arg(long)]
    pub package_dir: Option<PathBuf>,

    /// Where the archive is copied to
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Python interpreter running the build backend
    #[arg(long, env = "RADIO_RELEASE_PYTHON")]
    pub python: Option<String>,

    /// Also copy the wheel to the upload directory
    #[arg(long)]
    pub with_wheel: bool,

    /// Create the upload directory if it does not exist
    #[arg(long)]
    pub create_upload_dir: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ImageArgs {
    /// Application (image) name
    #[arg(long, env = "RADIO_RELEASE_APP_NAME")]
    pub app_name: Option<String>,

    /// Image version
    #[arg(long, env = "RADIO_RELEASE_IMAGE_VERSION")]
    pub version: Option<String>,

    /// Registry host
    #[arg(long, env = "RADIO_RELEASE_REGISTRY")]
    pub registry: Option<String>,

    /// Registry namespace (GCP project for gcr.io)
    #[arg(long, env = "RADIO_RELEASE_ORG")]
    pub org: Option<String>,

    /// Build context directory
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Container engine: docker or podman (detected when omitted)
    #[arg(long, env = "RADIO_RELEASE_RUNTIME")]
    pub runtime: Option<ContainerRuntime>,
}
