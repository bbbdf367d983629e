// brickforge/src/main.rs

mod cli;
mod commands;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use brickforge_core::ForgeError;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(err);
            ExitCode::FAILURE
        }
    }
}

// RUST_LOG=debug brickforge init ... to see every rendered file
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "brickforge={default_level},brickforge_core={default_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init {
            config_file,
            output_dir,
            template_dir,
        } => commands::init::execute(config_file, output_dir, template_dir),
        Commands::Validate { config_file } => commands::validate::execute(config_file),
        Commands::Verify { project_dir } => commands::verify::execute(project_dir),
        Commands::Options => commands::options::execute(),
    }
}

/// Library errors carry diagnostic codes and help, so they go through miette.
fn report(err: anyhow::Error) {
    match err.downcast::<ForgeError>() {
        Ok(forge) => eprintln!("{:?}", miette::Report::new(forge)),
        Err(other) => eprintln!("❌ {other:#}"),
    }
}
