//! NodeStore CLI
//!
//! Opens the database, brings its schema up to date, then runs one command.

use clap::{Parser, Subcommand};
use nodestore_core::logging_facility::{self, Profile};

mod commands;
mod startup;

#[derive(Debug, Parser)]
#[command(name = "nodestore")]
#[command(about = "NodeStore - typed records over SQLite", long_about = None)]
struct Cli {
    /// Database file, or `:memory:`
    #[arg(long, global = true, default_value = "nodestore.db")]
    db: String,

    /// Logging profile (development or production)
    #[arg(long, global = true, default_value = "development")]
    log: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Contact operations
    Contacts(commands::contacts::ContactsArgs),
    /// Post operations
    Posts(commands::posts::PostsArgs),
    /// Print the backing store's version
    Version,
    /// Migration operations
    Migrate(commands::migrate::MigrateArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = startup::open_gateway(&cli.db)?;

    match cli.command {
        Commands::Contacts(args) => commands::contacts::execute(args, &gateway),
        Commands::Posts(args) => commands::posts::execute(args, &gateway),
        Commands::Version => commands::version::execute(&gateway),
        Commands::Migrate(args) => commands::migrate::execute(args, &gateway),
    }
}
