//! Print a cached game.

use anyhow::Result;
use std::path::Path;

use super::load_board;
use crate::render;

/// Run the show command.
pub async fn run(cache_dir: &Path, namespace: &str, key: &str) -> Result<()> {
    let board = load_board(cache_dir, namespace, key).await?;

    println!("=== chross {} ===", key);
    println!();
    print!("{}", render::board(&board));

    if !board.log.is_empty() {
        println!();
        println!("Moves:");
        for (i, entry) in board.log.iter().enumerate() {
            println!("  {:>3}. {}", i + 1, entry.message);
        }
    }
    Ok(())
}
