// ═══════════════════════════════════════════════════════════════════════
// Tournament — many independent seeded games, played in parallel
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::play_seeded;
use conquest_engine::setup::SetupConfig;
use conquest_engine::{PlayerId, TerritoryGraph};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Seeds of consecutive games are this far apart.
pub const SEED_STRIDE: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub games: u32,
    pub players: u8,
    pub seed: u64,
    pub max_turns: u32,
    pub setup: SetupConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            games: 100,
            players: 2,
            seed: 42,
            max_turns: 100,
            setup: SetupConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TournamentSummary {
    pub games: u32,
    pub wins: BTreeMap<PlayerId, u32>,
    /// Games that hit the turn cap without a winner.
    pub draws: u32,
    pub errors: u32,
    pub average_turns: f64,
}

impl TournamentSummary {
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        f64::from(self.wins.get(&player).copied().unwrap_or(0)) / f64::from(self.games)
    }
}

pub fn run_tournament(graph: Arc<TerritoryGraph>, config: &TournamentConfig) -> TournamentSummary {
    tracing::info!(games = config.games, players = config.players, seed = config.seed, "tournament started");

    let results: Vec<_> = (0..config.games)
        .into_par_iter()
        .map(|g| {
            let seed = config.seed.wrapping_add(u64::from(g).wrapping_mul(SEED_STRIDE));
            let result = play_seeded(Arc::clone(&graph), config.players, &config.setup, seed, config.max_turns);
            if let Err(e) = &result {
                tracing::error!(game = g + 1, seed, error = %e, "game failed");
            }
            result
        })
        .collect();

    let mut summary = TournamentSummary { games: config.games, ..Default::default() };
    let mut total_turns = 0u64;
    let mut finished = 0u32;
    for result in results {
        match result {
            Ok(r) => {
                total_turns += u64::from(r.turns_played);
                finished += 1;
                match r.winner {
                    Some(p) => *summary.wins.entry(p).or_insert(0) += 1,
                    None => summary.draws += 1,
                }
            }
            Err(_) => summary.errors += 1,
        }
    }
    if finished > 0 {
        summary.average_turns = total_turns as f64 / f64::from(finished);
    }

    tracing::info!(draws = summary.draws, errors = summary.errors, "tournament finished");
    summary
}
