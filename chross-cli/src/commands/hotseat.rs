//! Play both sides of a game in one terminal.
//!
//! A north and a south session run over an in-memory hub exactly as two
//! remote clients would: they say hello, reconcile, and exchange every
//! move through the channel. Moves are read from stdin as
//! `HAND_INDEX FROM TO`, e.g. `0 6,3 4,3`, and played by whichever side
//! is to move.
//!
//! Each side keeps its own record, as separate clients would: north in
//! the cache directory itself (where `show` and `targets` look), south in
//! its `south/` subdirectory.

use anyhow::{anyhow, bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

use chross_client::{FileCache, HubTransport, MemoryHub, PeerSession, SessionConfig, SessionError};
use chross_core::{ChrossBoard, ChrossMove, ChrossRules, Position};
use chross_types::{GameKey, Pole, Side};

use crate::render;

type Session = PeerSession<ChrossRules, HubTransport, FileCache>;

/// Run the hotseat command.
pub async fn run(cache_dir: &Path, namespace: &str, key: &str, seed: Option<u64>) -> Result<()> {
    let game_key = GameKey::parse(key).context("Invalid game key")?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let initial = ChrossBoard::deal(&mut rng);

    let hub = MemoryHub::new();
    let open = |pole: Pole| {
        let config = SessionConfig::new(game_key.clone(), pole).with_namespace(namespace);
        PeerSession::open(
            config,
            ChrossRules,
            initial.clone(),
            hub.connect(),
            FileCache::new(side_cache_dir(cache_dir, pole)),
        )
    };
    let mut north = open(Pole::North).await?;
    let mut south = open(Pole::South).await?;

    north.connect().await?;
    south.connect().await?;
    settle(&hub, &mut north, &mut south).await?;
    if !north.loaded_from_cache() {
        north.start().await?;
        settle(&hub, &mut north, &mut south).await?;
    }

    println!("=== chross hotseat {} ===", game_key);
    if north.loaded_from_cache() {
        println!("Resumed {} cached moves", north.log().len());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!();
        print!("{}", render::board(north.board()));
        if north.board().is_over() {
            break;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }

        let side = north.board().turn;
        let mv = match parse_move(line) {
            Ok((hand_index, from, to)) => {
                ChrossMove::drawing(north.board(), side, hand_index, from, to, &mut rng)
            }
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let mover = match side {
            Side::North => &mut north,
            Side::South => &mut south,
        };
        match mover.submit(mv).await {
            Ok(id) => tracing::debug!("{} played {}", side, id),
            Err(SessionError::Rejected(reason)) => println!("Rejected: {}", reason),
            Err(e) => return Err(e.into()),
        }
        settle(&hub, &mut north, &mut south).await?;

        if north.snapshot() != south.snapshot() {
            bail!("Sessions diverged");
        }
    }

    north.stop().await?;
    south.stop().await?;
    Ok(())
}

fn side_cache_dir(cache_dir: &Path, pole: Pole) -> PathBuf {
    match pole {
        Pole::North => cache_dir.to_path_buf(),
        other => cache_dir.join(other.as_str()),
    }
}

/// Pump both sessions until the hub has nothing left to deliver.
async fn settle(hub: &MemoryHub, north: &mut Session, south: &mut Session) -> Result<()> {
    while hub.pending() > 0 {
        north.pump().await?;
        south.pump().await?;
    }
    Ok(())
}

/// Parse `HAND_INDEX FROM TO`.
fn parse_move(line: &str) -> Result<(usize, Position, Position)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [hand, from, to] = parts.as_slice() else {
        bail!("Expected HAND_INDEX FROM TO, e.g. 0 6,3 4,3");
    };
    let hand_index = hand
        .parse()
        .with_context(|| format!("Invalid hand index {:?}", hand))?;
    let from = from.parse().map_err(|e: String| anyhow!(e))?;
    let to = to.parse().map_err(|e: String| anyhow!(e))?;
    Ok((hand_index, from, to))
}
