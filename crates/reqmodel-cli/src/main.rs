//! reqmodel CLI
//!
//! Stores and retrieves logic expressions and scenario step trees as JSON.

use clap::{Parser, Subcommand};
use reqmodel_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "reqmodel")]
#[command(about = "reqmodel - requirements model tree storage", long_about = None)]
struct Cli {
    /// Logging profile (dev or prod); logs go to stderr
    #[arg(long, global = true)]
    log: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate(commands::migrate::MigrateArgs),
    /// Logic expression trees
    Expr(commands::TreeArgs),
    /// Scenario step trees
    Steps(commands::TreeArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(profile) = cli.log {
        logging_facility::init(profile);
    }

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args),
        Commands::Expr(args) => commands::expr::execute(args),
        Commands::Steps(args) => commands::steps::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
