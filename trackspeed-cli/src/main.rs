//! TrackSpeed CLI - Command-line interface
//!
//! This binary provides a command-line interface to the TrackSpeed library.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trackspeed::logging::{default_log_dir, default_log_file, init_logging};

use commands::cache::CacheAction;
use commands::resolve::ResolveArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "trackspeed")]
#[command(version = trackspeed::VERSION)]
#[command(about = "Annotate GPS tracks with legal speed limits", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.trackspeed/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve speed limits for every point of a track file
    Resolve(ResolveArgs),

    /// Manage the speed limit store
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

fn main() {
    let cli = Cli::parse();

    let _logging_guard = match init_logging(&default_log_dir(), default_log_file()) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, config_path),
        Commands::Cache { action } => commands::cache::run(action, config_path),
    };

    if let Err(e) = result {
        e.exit();
    }
}
