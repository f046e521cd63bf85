// ═══════════════════════════════════════════════════════════════════════
// Game setup — seeded automatic territory distribution
// Every player receives the same number of random starting territories;
// everything else starts neutral.
// ═══════════════════════════════════════════════════════════════════════

use crate::map::TerritoryGraph;
use crate::state::GameState;
use crate::types::{NodeId, PlayerId};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    pub territories_per_player: usize,
    pub armies_per_territory: i32,
    pub neutral_armies: i32,
}

impl Default for SetupConfig {
    fn default() -> Self {
        SetupConfig {
            territories_per_player: 2,
            armies_per_territory: 2,
            neutral_armies: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("need {needed} territories for {players} players, map has {available}")]
    NotEnoughTerritories { needed: usize, available: usize, players: usize },

    #[error("player list is empty")]
    NoPlayers,

    #[error("{0} cannot be a player (neutral or listed twice)")]
    BadPlayer(PlayerId),

    #[error("army counts must not be negative")]
    NegativeArmies,
}

/// Create the opening position for `players` on `graph`. Deterministic per seed.
pub fn create_initial_state(
    graph: Arc<TerritoryGraph>,
    players: &[PlayerId],
    config: &SetupConfig,
    seed: u64,
) -> Result<GameState, SetupError> {
    if players.is_empty() {
        return Err(SetupError::NoPlayers);
    }
    for (i, &p) in players.iter().enumerate() {
        if p.is_neutral() || players[..i].contains(&p) {
            return Err(SetupError::BadPlayer(p));
        }
    }
    if config.armies_per_territory < 0 || config.neutral_armies < 0 {
        return Err(SetupError::NegativeArmies);
    }

    let available = graph.node_count();
    let needed = players.len() * config.territories_per_player;
    if needed > available {
        return Err(SetupError::NotEnoughTerritories { needed, available, players: players.len() });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pool: Vec<NodeId> = (0..available).map(NodeId::from_index).collect();
    pool.shuffle(&mut rng);

    let mut state = GameState::empty(graph);
    for node in state.nodes().collect::<Vec<_>>() {
        state.set_armies(node, config.neutral_armies);
    }
    for (chunk, &player) in pool.chunks(config.territories_per_player.max(1)).zip(players) {
        if config.territories_per_player == 0 {
            break;
        }
        for &node in chunk {
            state.set_owner(node, player);
            state.set_armies(node, config.armies_per_territory);
        }
    }

    tracing::debug!(seed, players = players.len(), "initial state created");
    Ok(state)
}
