use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use user_store::prelude::*;

mod commands;
mod fake;
mod output;

/// user-store - exercise the user repository against PostgreSQL
#[derive(Parser)]
#[command(name = "user-store")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to the standard search path)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Repository backend, overrides the configuration
    #[arg(short, long, global = true, value_name = "BACKEND")]
    backend: Option<Backend>,

    /// Database URL, overrides the configuration
    #[arg(long, global = true, env = "DATABASE_URL", value_name = "URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a random user and run every repository operation on it
    Demo,
    /// Fetch a user by id
    Get {
        /// User id
        id: uuid::Uuid,
    },
    /// Fetch a user by email
    Find {
        /// Email address, matched case-insensitively
        email: String,
    },
    /// Search users
    Search(commands::SearchArgs),
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(backend) = self.backend {
            config.repository.backend = backend;
        }
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        Ok(config)
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    init_tracing(&config)?;

    let session = PgSession::connect(&config.database).await?;
    let store = UserStore::new(config.repository.backend, session);
    tracing::info!(backend = %store.backend(), "repository ready");

    match cli.command {
        Commands::Demo => commands::demo(&store).await,
        Commands::Get { id } => commands::get(&store, id).await,
        Commands::Find { email } => commands::find(&store, &email).await,
        Commands::Search(args) => commands::search(&store, args).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}
