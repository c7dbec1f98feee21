//! Build-time tools for Arrival
//!
//! - `extract`: pull route coordinate arrays out of the map component source
//!   into `<out-dir>/<route>.json`
//! - `gpx`: convert a GPX recording into a route coordinate array

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "arrival-cli", version, about = "Arrival route data tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract route paths from a source document into JSON artifacts
    Extract(commands::extract::ExtractArgs),
    /// Convert a GPX file into a route coordinate array
    Gpx(commands::gpx::GpxArgs),
}

fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Extract(args) => commands::extract::run(args),
        Commands::Gpx(args) => commands::gpx::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
