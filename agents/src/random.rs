// ═══════════════════════════════════════════════════════════════════════
// Random Agent — deploys and moves every army at random.
// Serves as baseline and for exercising the engine.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use crate::helper::{collect_attacks, collect_deploys};
use conquest_engine::{resolve_turn, GameState, NodeId, Order, PlayerId};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct RandomAgent {
    player: PlayerId,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(player: PlayerId, seed: u64) -> Self {
        RandomAgent {
            player,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Spend the whole income one army at a time on random owned territories.
    fn deploys(&mut self, state: &GameState) -> Vec<Order> {
        let owned = state.owned_by(self.player);
        let income = state.income(self.player);
        if owned.is_empty() || income <= 0 {
            return Vec::new();
        }
        let picks: Vec<NodeId> = (0..income)
            .filter_map(|_| owned.choose(&mut self.rng).copied())
            .collect();
        collect_deploys(self.player, picks)
    }

    /// Send each army on each owned territory to a random neighbour.
    fn attacks(&mut self, state: &GameState) -> Vec<Order> {
        let mut moves = Vec::new();
        for src in state.owned_by(self.player) {
            let neighbors = state.neighbors(src, false);
            for _ in 0..state.armies_at(src) {
                if let Some(&dst) = neighbors.choose(&mut self.rng) {
                    moves.push((src, dst));
                }
            }
        }
        collect_attacks(self.player, moves)
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }
    fn player(&self) -> PlayerId { self.player }

    fn orders(&mut self, state: &GameState) -> Vec<Order> {
        let deploys = self.deploys(state);
        // Plan moves against the board as it will look after our deploys.
        let staged = match resolve_turn(state, &deploys) {
            Ok(staged) => staged,
            Err(e) => {
                tracing::warn!(player = %self.player, error = %e, "own deploys rejected; skipping moves");
                return deploys;
            }
        };
        let attacks = self.attacks(&staged);
        deploys.into_iter().chain(attacks).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquest_engine::map::sample_map;
    use conquest_engine::setup::{create_initial_state, SetupConfig};
    use std::sync::Arc;

    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    fn opening(seed: u64) -> GameState {
        let graph = Arc::new(sample_map().unwrap());
        create_initial_state(graph, &[P1, P2], &SetupConfig::default(), seed).unwrap()
    }

    #[test]
    fn test_same_seed_same_orders() {
        let state = opening(3);
        let a = RandomAgent::new(P1, 11).orders(&state);
        let b = RandomAgent::new(P1, 11).orders(&state);
        assert_eq!(a, b);
    }

    #[test]
    fn test_deploys_spend_exact_income() {
        let state = opening(5);
        let orders = RandomAgent::new(P1, 1).orders(&state);
        let deployed: i32 = orders.iter()
            .filter(|o| matches!(o, Order::Deploy(_)))
            .map(Order::armies)
            .sum();
        assert_eq!(deployed, state.income(P1));
        assert!(orders.iter().all(|o| o.player() == P1));
    }

    #[test]
    fn test_orders_resolve_cleanly() {
        let state = opening(9);
        let orders = RandomAgent::new(P2, 4).orders(&state);
        assert!(!orders.is_empty());
        assert!(resolve_turn(&state, &orders).is_ok());
    }

    #[test]
    fn test_moves_never_exceed_staged_armies() {
        let state = opening(12);
        let orders = RandomAgent::new(P1, 8).orders(&state);
        let staged = resolve_turn(&state, &orders.iter().copied().filter(|o| matches!(o, Order::Deploy(_))).collect::<Vec<_>>()).unwrap();
        for src in state.owned_by(P1) {
            let sent: i32 = orders.iter()
                .filter_map(|o| match o {
                    Order::AttackTransfer(a) if a.src == src => Some(a.armies),
                    _ => None,
                })
                .sum();
            assert_eq!(sent, staged.armies_at(src));
        }
    }

    #[test]
    fn test_eliminated_player_sends_nothing() {
        let state = opening(1);
        assert!(RandomAgent::new(PlayerId(9), 0).orders(&state).is_empty());
    }
}
