//! Suggest destinations for a checker.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

use chross_core::{targetable_squares, Piece, Position};

use super::load_board;

/// Run the targets command.
pub async fn run(cache_dir: &Path, namespace: &str, key: &str, from: &str, piece: &str) -> Result<()> {
    let from: Position = from.parse().map_err(|e: String| anyhow!(e))?;
    let piece: Piece = piece.parse()?;
    let board = load_board(cache_dir, namespace, key).await?;

    let checker = board
        .checker_at(from)
        .with_context(|| format!("No checker at {}", from))?;
    let squares = targetable_squares(&board, checker.pole, checker, piece);

    if squares.is_empty() {
        println!("{} {} at {} has no moves", checker.pole, piece, from);
    } else {
        let list: Vec<String> = squares.iter().map(Position::to_string).collect();
        println!("{} {} at {} can reach: {}", checker.pole, piece, from, list.join(" "));
    }
    Ok(())
}
