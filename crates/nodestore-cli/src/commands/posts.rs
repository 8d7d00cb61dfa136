//! Post commands

use clap::{Args, Subcommand};
use nodestore_core::{Post, Record, Value};
use nodestore_store::StoreGateway;

use super::{listing, print_json};

#[derive(Debug, Args)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PostsCommand {
    /// Save a post from `--content`, or decode one from a JSON payload
    Create(CreateArgs),
    /// Print every stored post
    List,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long, conflicts_with = "json", required_unless_present = "json")]
    pub content: Option<String>,

    /// Payload such as '{"content": "..."}'; an `id` in it is kept
    #[arg(long)]
    pub json: Option<String>,
}

pub fn execute(args: PostsArgs, gateway: &StoreGateway) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        PostsCommand::Create(create) => {
            let post = match (create.content, create.json) {
                (Some(content), _) => Post::new(content),
                (None, Some(payload)) => {
                    let value: Value = serde_json::from_str(&payload)?;
                    Post::decode(&value)?
                }
                (None, None) => return Err("Must specify either --content or --json".into()),
            };
            let saved = gateway.save(post)?;
            print_json(&saved.encode())
        }
        PostsCommand::List => {
            let posts = gateway.fetch_all::<Post>()?;
            print_json(&listing("posts", posts.iter().map(Record::encode).collect()))
        }
    }
}
