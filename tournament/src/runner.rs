// ═══════════════════════════════════════════════════════════════════════
// Game Runner — plays a complete local game with agents
//
// Every turn, each agent looks at the same pre-turn state and submits its
// orders. The batches are concatenated in agent order and resolved in one
// go. An order the resolver rejects is dropped and the rest retried.
// ═══════════════════════════════════════════════════════════════════════

use conquest_agents::{Agent, RandomAgent};
use conquest_engine::setup::{create_initial_state, SetupConfig, SetupError};
use conquest_engine::{resolve_turn, GameState, InvalidStateError, Order, PlayerId, ResolveError, TerritoryGraph};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Result of a completed (or turn-capped) game.
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub seed: u64,
    /// `None` if the turn cap was hit first.
    pub winner: Option<PlayerId>,
    pub turns_played: u32,
    pub dropped_orders: usize,
    pub player_results: Vec<PlayerResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerResult {
    pub player: PlayerId,
    pub agent_name: String,
    pub territories: usize,
    pub armies: i64,
    pub income: i32,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no agents to play")]
    NoAgents,

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("game state corrupted on turn {turn}: {source}")]
    Corrupted { turn: u32, source: InvalidStateError },
}

/// One `RandomAgent` per player id `1..=player_count`.
pub fn make_agents(player_count: u8, seed: u64) -> Vec<Box<dyn Agent>> {
    (1..=player_count)
        .map(|p| Box::new(RandomAgent::new(PlayerId(u64::from(p)), seed.wrapping_add(u64::from(p)))) as Box<dyn Agent>)
        .collect()
}

/// Set up a fresh board on `graph` and play it out with random agents.
pub fn play_seeded(
    graph: Arc<TerritoryGraph>,
    player_count: u8,
    setup: &SetupConfig,
    seed: u64,
    max_turns: u32,
) -> Result<GameResult, GameError> {
    let mut agents = make_agents(player_count, seed);
    let players: Vec<PlayerId> = agents.iter().map(|a| a.player()).collect();
    let state = create_initial_state(graph, &players, setup, seed)?;
    run_game(state, &mut agents, seed, max_turns)
}

/// Run turns until one player owns every non-neutral territory or
/// `max_turns` is reached.
pub fn run_game(
    initial: GameState,
    agents: &mut [Box<dyn Agent>],
    seed: u64,
    max_turns: u32,
) -> Result<GameResult, GameError> {
    if agents.is_empty() {
        return Err(GameError::NoAgents);
    }

    let mut state = initial;
    let mut turns_played = 0;
    let mut dropped_orders = 0;

    while state.winner().is_none() && turns_played < max_turns {
        let orders: Vec<Order> = agents.iter_mut()
            .flat_map(|agent| agent.orders(&state))
            .collect();

        let (next, dropped) = resolve_dropping_invalid(&state, orders)
            .map_err(|source| GameError::Corrupted { turn: turns_played + 1, source })?;
        state = next;
        dropped_orders += dropped;
        turns_played += 1;
    }

    let winner = state.winner();
    tracing::info!(seed, turns = turns_played, winner = ?winner, "game finished");
    Ok(build_result(&state, agents, seed, winner, turns_played, dropped_orders))
}

/// Resolve `orders`, discarding rejected ones until the remainder goes through.
fn resolve_dropping_invalid(
    state: &GameState,
    mut orders: Vec<Order>,
) -> Result<(GameState, usize), InvalidStateError> {
    let mut dropped = 0;
    loop {
        match resolve_turn(state, &orders) {
            Ok(next) => return Ok((next, dropped)),
            Err(ResolveError::InvalidOrder { index, error }) => {
                tracing::warn!(index, %error, "dropping rejected order");
                orders.remove(index);
                dropped += 1;
            }
            Err(ResolveError::InvalidState(e)) => return Err(e),
        }
    }
}

fn build_result(
    state: &GameState,
    agents: &[Box<dyn Agent>],
    seed: u64,
    winner: Option<PlayerId>,
    turns_played: u32,
    dropped_orders: usize,
) -> GameResult {
    let player_results = agents.iter()
        .map(|agent| {
            let player = agent.player();
            PlayerResult {
                player,
                agent_name: agent.name().to_string(),
                territories: state.owned_by(player).len(),
                armies: state.total_armies(player),
                income: state.income(player),
            }
        })
        .collect();

    GameResult { seed, winner, turns_played, dropped_orders, player_results }
}
