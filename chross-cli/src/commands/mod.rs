//! CLI command implementations.

pub mod auth;
pub mod hotseat;
pub mod new_game;
pub mod show;
pub mod targets;

use anyhow::{Context, Result};
use std::path::Path;

use chross_client::{cache_key, FileCache, Snapshot, StateCache};
use chross_core::{replay, ChrossBoard, ChrossMove, ChrossRules};
use chross_types::GameKey;

/// Load a cached game and replay its log.
///
/// Records without an initial board cannot be replayed; their cached
/// board is used as is.
pub(crate) async fn load_board(cache_dir: &Path, namespace: &str, key: &str) -> Result<ChrossBoard> {
    let game_key = GameKey::parse(key).context("Invalid game key")?;
    let record_key = cache_key(namespace, &game_key);
    let cache = FileCache::new(cache_dir);

    let raw = cache
        .load(&record_key)
        .await?
        .with_context(|| format!("No cached game for key {} in {}", key, cache_dir.display()))?;
    let snapshot: Snapshot<ChrossBoard, ChrossMove> = Snapshot::decode(&record_key, &raw)?;

    match &snapshot.initial_board {
        Some(initial) => replay(&ChrossRules, initial, &snapshot.actions)
            .with_context(|| format!("Cached log for {} does not replay", key)),
        None => Ok(snapshot.board),
    }
}
