//! # chross
//!
//! CLI for serverless Chross games.
//!
//! ## Commands
//!
//! - `new-game`: Mint a game key and print both join parameters
//! - `auth`: Sign a private-channel subscription
//! - `show`: Print a cached game
//! - `targets`: List the squares a checker could reach
//! - `hotseat`: Play both sides in one terminal
//!
//! ## Example
//!
//! ```bash
//! # Mint a game
//! chross new-game
//!
//! # Play it locally, moves as "HAND_INDEX FROM TO"
//! chross hotseat --key q7Zt-x
//! > 0 6,3 4,3
//!
//! # Inspect the cached log
//! chross show --key q7Zt-x
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{auth, hotseat, new_game, show, targets};
use config::CliConfig;

/// CLI for serverless Chross games.
#[derive(Parser, Debug)]
#[command(name = "chross")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for cached games
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (default: <data-dir>/chross.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mint a game key and print the join parameters for both sides
    NewGame,

    /// Print the authorization payload for a private channel subscription
    Auth {
        /// Socket id assigned by the channel service
        #[arg(long)]
        socket_id: String,

        /// Channel to authorize (private-<game key>)
        #[arg(long)]
        channel: String,
    },

    /// Print the cached board of a game
    Show {
        /// Game key
        #[arg(long, short)]
        key: String,
    },

    /// List the squares a checker could move to with a piece
    Targets {
        /// Game key
        #[arg(long, short)]
        key: String,

        /// Square of the checker, as ROW,COL
        #[arg(long)]
        from: String,

        /// Piece to play (pawn, knight, bishop, rook, queen, king)
        #[arg(long)]
        piece: String,
    },

    /// Play both sides of a game in this terminal
    Hotseat {
        /// Game key
        #[arg(long, short)]
        key: String,

        /// Seed for the initial deal and the draws
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    let config = CliConfig::load(cli.config.as_deref(), &data_dir)
        .await
        .context("Failed to load configuration")?;
    let cache_dir = config.cache_dir(&data_dir);

    match cli.command {
        Commands::NewGame => {
            new_game::run();
        }
        Commands::Auth { socket_id, channel } => {
            auth::run(&socket_id, &channel)?;
        }
        Commands::Show { key } => {
            show::run(&cache_dir, &config.session.namespace, &key).await?;
        }
        Commands::Targets { key, from, piece } => {
            targets::run(&cache_dir, &config.session.namespace, &key, &from, &piece).await?;
        }
        Commands::Hotseat { key, seed } => {
            hotseat::run(&cache_dir, &config.session.namespace, &key, seed).await?;
        }
    }

    Ok(())
}

/// Get the default data directory for chross.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "chross", "chross")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
