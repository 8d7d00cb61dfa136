//! Migration commands
//!
//! Startup has already applied pending migrations by the time these run.

use clap::{Args, Subcommand};
use nodestore_core::Value;
use nodestore_store::migrations::applied_migrations;
use nodestore_store::{revert_migrations, StoreGateway};

use super::{listing, print_json};
use crate::startup;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// List recorded migrations in the order they were applied
    Status,
    /// Drop every table the recorded migrations created
    Revert,
}

pub fn execute(
    args: MigrateArgs,
    gateway: &StoreGateway,
) -> Result<(), Box<dyn std::error::Error>> {
    let driver = gateway.driver()?;
    match args.command {
        MigrateCommand::Status => {
            let applied = applied_migrations(driver)?;
            print_json(&listing(
                "applied",
                applied.into_iter().map(Value::from).collect(),
            ))
        }
        MigrateCommand::Revert => {
            let reverted = revert_migrations(&startup::migrations()?, driver)?;
            print_json(&Value::mapping([("reverted", Value::from(reverted as i64))]))
        }
    }
}
