//! Outpost CLI - Database migrations and world management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! outpost-cli migrate
//!
//! # Create a world
//! outpost-cli world create --name "Season 1"
//!
//! # List worlds
//! outpost-cli world list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "outpost-cli")]
#[command(author, version, about = "Outpost CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage world maps
    World {
        #[command(subcommand)]
        action: WorldAction,
    },
}

#[derive(Subcommand)]
enum WorldAction {
    /// Create a new world
    Create {
        /// World name
        #[arg(short, long)]
        name: String,
    },
    /// List all worlds
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::World { action } => match action {
            WorldAction::Create { name } => commands::world::create(&name).await,
            WorldAction::List => commands::world::list().await,
        },
    }
}
