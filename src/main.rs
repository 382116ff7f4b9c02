//! Headless battle runner (default binary).
//!
//! Plays a few turns against the idle opponent on a fixed timestep and prints
//! the board after every swap. No rendering; the log goes to stderr.
//!
//! Config: first argument or `MATCH_BATTLE_CONFIG` (JSON file, optional).
//! Turns: `MATCH_BATTLE_TURNS` (default 3).

use std::time::Duration;

use anyhow::{Context, Result};

use match_battle::core::{BattleConfig, Grid};
use match_battle::engine::{BattleEvent, BattleSession};
use match_battle::types::{Coord, Side, TICK_MS};

const DEFAULT_TURNS: u32 = 3;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    let turns: u32 = match std::env::var("MATCH_BATTLE_TURNS") {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid MATCH_BATTLE_TURNS: {raw}"))?,
        Err(_) => DEFAULT_TURNS,
    };

    run(BattleSession::new(config), turns).await
}

fn load_config() -> Result<BattleConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MATCH_BATTLE_CONFIG").ok());
    match path {
        Some(path) => {
            BattleConfig::load(&path).with_context(|| format!("loading config from {path}"))
        }
        None => Ok(BattleConfig::default()),
    }
}

async fn run(mut session: BattleSession, turns: u32) -> Result<()> {
    println!("{}", session.grid());

    let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS as u64));
    let mut player_turns_done = 0;

    while player_turns_done < turns {
        interval.tick().await;

        if session.side() == Side::Player {
            match pick_swap(session.grid()) {
                Some((from, to)) => {
                    let report = session.commit_swap(from, to)?;
                    println!(
                        "swap {:?} <-> {:?}: {} (chain {}, cleared {})",
                        (from.x, from.y),
                        (to.x, to.y),
                        if report.reverted { "reverted" } else { "matched" },
                        report.chain_len(),
                        report.cleared_by_type.total()
                    );
                    println!("{}", session.grid());
                }
                None => {
                    session.end_player_turn();
                }
            }
        } else {
            session.tick(TICK_MS);
        }

        for event in session.drain_events() {
            if let BattleEvent::TurnChanged { side, moves } = event {
                tracing::info!(?side, moves, "turn changed");
                if side == Side::Opponent {
                    player_turns_done += 1;
                }
            }
        }
    }

    let cleared = session.cleared_counts();
    for (tile, count) in cleared.iter() {
        println!("type {tile}: {count}");
    }
    println!("total cleared: {}", cleared.total());
    Ok(())
}

/// A swap that matches, or any legal swap (which will revert) when none does.
fn pick_swap(grid: &Grid) -> Option<(Coord, Coord)> {
    if let Some(swap) = grid.find_productive_swap() {
        return Some(swap);
    }
    let origin = Coord::new(0, 0);
    if grid.width() > 1 {
        Some((origin, Coord::new(1, 0)))
    } else if grid.height() > 1 {
        Some((origin, Coord::new(0, 1)))
    } else {
        None
    }
}
