use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod build;
mod commands;
mod config;
mod util;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: QuireCommand,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the project in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "quire.yaml")]
    config_file: Option<PathBuf>,

    /// Log each stage of the build
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser)]
struct CleanArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "quire.yaml")]
    config_file: Option<PathBuf>,

    /// Show what would be deleted without deleting it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum QuireCommand {
    /// Initialize a new quire project
    Init(InitArgs),

    /// Build the site
    Build(BuildArgs),

    /// Remove the generated site
    Clean(CleanArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode, anyhow::Error> {
    let args = Args::parse();

    let verbose = matches!(&args.command, QuireCommand::Build(build) if build.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        QuireCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        QuireCommand::Build(args) => {
            if !commands::build::run(&args).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        QuireCommand::Clean(args) => {
            commands::clean::run(&args).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
