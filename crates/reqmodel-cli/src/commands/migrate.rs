//! Schema migration command

use super::{open_db, CliResult};
use clap::Args;
use reqmodel_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[arg(long, default_value = ".reqmodel/store.db")]
    pub db: String,
}

pub fn execute(args: MigrateArgs) -> CliResult {
    let mut conn = open_db(&args.db)?;

    if let EngineCommandResult::Migrated { applied } =
        apply_engine_command(EngineCommand::Migrate, &mut conn)?
    {
        if applied.is_empty() {
            println!("Schema up to date");
        }
        for id in applied {
            println!("Applied {}", id);
        }
    }
    Ok(())
}
