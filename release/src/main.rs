use clap::Parser;
use image_builder::publish_image;
use package_builder::build_package;
use release::cli::{Cli, Commands};
use release::config::{resolve_image, resolve_package, ReleaseFile};
use release::error::ReleaseError;
use runner::{CommandRunner, DryRunRunner, SystemRunner};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("✗ {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), ReleaseError> {
    let cwd = std::env::current_dir().map_err(|e| release::ConfigError::BaseDir {
        path: PathBuf::from("."),
        source: e,
    })?;
    let file = ReleaseFile::discover(cli.config.as_deref(), &cwd)?;

    let runner: Box<dyn CommandRunner> = if cli.dry_run {
        Box::new(DryRunRunner::new().with_echo(true))
    } else {
        Box::new(SystemRunner::new())
    };
    info!(runner = runner.runner_name(), "starting");

    match cli.command {
        Commands::Package(args) => {
            let config = resolve_package(&args, &file.package, &cwd)?;
            let report = build_package(&config, runner.as_ref()).await?;
            match report.archive {
                Some(archive) => {
                    println!(
                        "✓ Staged {} ({} bytes)",
                        archive.path.display(),
                        archive.bytes
                    );
                    for wheel in report.wheels {
                        println!("✓ Staged {} ({} bytes)", wheel.path.display(), wheel.bytes);
                    }
                }
                None => println!("Dry run: nothing copied to {}", report.upload_dir.display()),
            }
        }
        Commands::Image(args) => {
            let config = resolve_image(&args, &file.image, &cwd)?;
            let report = publish_image(&config, runner.as_ref()).await?;
            let verb = if runner.is_dry_run() {
                "Would push"
            } else {
                "Pushed"
            };
            for tag in &report.pushed {
                println!("✓ {} {}", verb, tag);
            }
            info!(
                image = %report.local_tag,
                runtime = %report.runtime,
                elapsed = ?report.duration,
                "publish complete"
            );
        }
    }

    Ok(())
}
