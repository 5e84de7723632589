//! Subcommand implementations

pub mod expr;
pub mod migrate;
pub mod steps;

use clap::{Args, Subcommand};
use reqmodel_engine::{apply_engine_command, EngineCommand};
use reqmodel_store::errors::{io_error, serialization_error};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use std::path::Path;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct TreeArgs {
    #[command(subcommand)]
    pub command: TreeCommand,
}

#[derive(Debug, Subcommand)]
pub enum TreeCommand {
    /// Store the tree read from a JSON file, replacing any stored tree
    ///
    /// The file is parsed with serde_json's default nesting limit of 128
    /// levels; deeper trees are rejected with ERR_SERIALIZATION.
    Put(PutArgs),
    /// Print the stored tree as JSON
    Get(OwnerArgs),
    /// Print one line per stored owner: `ok` or the rebuild error code
    List(ModelArgs),
    /// Remove the stored tree
    Delete(OwnerArgs),
}

#[derive(Debug, Args)]
pub struct ModelArgs {
    #[arg(long, default_value = ".reqmodel/store.db")]
    pub db: String,

    #[arg(long)]
    pub model: String,
}

#[derive(Debug, Args)]
pub struct OwnerArgs {
    #[command(flatten)]
    pub target: ModelArgs,

    #[arg(long)]
    pub owner: String,
}

#[derive(Debug, Args)]
pub struct PutArgs {
    #[command(flatten)]
    pub owner: OwnerArgs,

    /// JSON file holding the tree (at most 128 levels of nesting)
    #[arg(long)]
    pub file: String,
}

/// Open the database, creating its directory if needed
pub fn open_db(db: &str) -> Result<Connection, Box<dyn std::error::Error>> {
    if let Some(dir) = Path::new(db).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_error("open_db", e))?;
    }
    Ok(reqmodel_store::db::open_ready(db)?)
}

/// Open the database with pending migrations applied
pub fn open_store(db: &str) -> Result<Connection, Box<dyn std::error::Error>> {
    let mut conn = open_db(db)?;
    apply_engine_command(EngineCommand::Migrate, &mut conn)?;
    Ok(conn)
}

/// Read a JSON tree from `path`
pub fn read_tree<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error("read_tree", e))?;
    let tree = serde_json::from_str(&text).map_err(|e| serialization_error("read_tree", e))?;
    Ok(tree)
}

pub fn print_json<T: serde::Serialize>(tree: &T) -> CliResult {
    let text = serde_json::to_string_pretty(tree).map_err(|e| serialization_error("print_json", e))?;
    println!("{}", text);
    Ok(())
}
