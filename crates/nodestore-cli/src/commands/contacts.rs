//! Contact commands

use clap::{Args, Subcommand};
use nodestore_core::{Contact, Record};
use nodestore_store::StoreGateway;

use super::{listing, print_json};

#[derive(Debug, Args)]
pub struct ContactsArgs {
    #[command(subcommand)]
    pub command: ContactsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ContactsCommand {
    /// Save a new contact and print it with its assigned id
    Create(CreateArgs),
    /// Print every stored contact
    List,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,
}

pub fn execute(
    args: ContactsArgs,
    gateway: &StoreGateway,
) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        ContactsCommand::Create(create) => {
            let saved = gateway.save(Contact::new(create.name, create.email))?;
            print_json(&saved.encode())
        }
        ContactsCommand::List => {
            let contacts = gateway.fetch_all::<Contact>()?;
            print_json(&listing(
                "contacts",
                contacts.iter().map(Record::encode).collect(),
            ))
        }
    }
}
