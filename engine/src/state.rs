// ═══════════════════════════════════════════════════════════════════════
// Game state — per-territory armies and ownership over a shared graph
// ═══════════════════════════════════════════════════════════════════════

use crate::error::InvalidStateError;
use crate::map::TerritoryGraph;
use crate::types::{NodeId, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Base income every player receives before bonus regions.
pub const BASE_INCOME: i32 = 5;

/// One territory's entry in an external state snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritorySnapshot {
    pub node: NodeId,
    pub armies: i32,
    pub owner: PlayerId,
}

/// Mutable board state. Owns its army/owner arrays exclusively; the graph is
/// shared and read-only. `clone()` gives a fully independent copy.
#[derive(Debug, Clone)]
pub struct GameState {
    graph: Arc<TerritoryGraph>,
    armies: Vec<i32>,
    owner: Vec<PlayerId>,
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.graph, &other.graph) || self.graph == other.graph)
            && self.armies == other.armies
            && self.owner == other.owner
    }
}

impl Eq for GameState {}

impl GameState {
    pub fn new(
        graph: Arc<TerritoryGraph>,
        armies: Vec<i32>,
        owner: Vec<PlayerId>,
    ) -> Result<Self, InvalidStateError> {
        let state = GameState { graph, armies, owner };
        state.assert_valid()?;
        Ok(state)
    }

    /// Build a state from a snapshot that names every territory exactly once.
    pub fn from_snapshot(
        graph: Arc<TerritoryGraph>,
        snapshot: &[TerritorySnapshot],
    ) -> Result<Self, InvalidStateError> {
        let n = graph.node_count();
        if snapshot.len() != n {
            return Err(InvalidStateError::SnapshotMismatch(format!(
                "{} entries for {} territories", snapshot.len(), n
            )));
        }

        let mut armies = vec![0; n];
        let mut owner = vec![PlayerId::NEUTRAL; n];
        let mut seen = vec![false; n];
        for entry in snapshot {
            let i = entry.node.index();
            if i >= n {
                return Err(InvalidStateError::SnapshotMismatch(format!("unknown territory {}", entry.node)));
            }
            if seen[i] {
                return Err(InvalidStateError::SnapshotMismatch(format!("{} listed twice", entry.node)));
            }
            seen[i] = true;
            armies[i] = entry.armies;
            owner[i] = entry.owner;
        }

        GameState::new(graph, armies, owner)
    }

    /// Neutral board with zero armies everywhere.
    pub fn empty(graph: Arc<TerritoryGraph>) -> Self {
        let n = graph.node_count();
        GameState { graph, armies: vec![0; n], owner: vec![PlayerId::NEUTRAL; n] }
    }

    pub fn snapshot(&self) -> Vec<TerritorySnapshot> {
        self.armies.iter().zip(&self.owner).enumerate()
            .map(|(i, (&armies, &owner))| TerritorySnapshot { node: NodeId::from_index(i), armies, owner })
            .collect()
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn graph(&self) -> &Arc<TerritoryGraph> { &self.graph }
    pub fn len(&self) -> usize { self.armies.len() }
    pub fn is_empty(&self) -> bool { self.armies.is_empty() }
    pub fn armies(&self) -> &[i32] { &self.armies }
    pub fn owners(&self) -> &[PlayerId] { &self.owner }

    pub fn armies_at(&self, node: NodeId) -> i32 {
        self.armies[node.index()]
    }

    pub fn owner_of(&self, node: NodeId) -> PlayerId {
        self.owner[node.index()]
    }

    /// Does not validate; call [`Self::assert_valid`] afterwards.
    pub fn set_armies(&mut self, node: NodeId, armies: i32) {
        self.armies[node.index()] = armies;
    }

    pub fn set_owner(&mut self, node: NodeId, owner: PlayerId) {
        self.owner[node.index()] = owner;
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.armies.len()).map(NodeId::from_index)
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Adjacent territories, optionally followed by `node` itself.
    pub fn neighbors(&self, node: NodeId, include_self: bool) -> Vec<NodeId> {
        let mut out = self.graph.neighbors(node).to_vec();
        if include_self {
            out.push(node);
        }
        out
    }

    pub fn owned_by(&self, player: PlayerId) -> Vec<NodeId> {
        self.nodes().filter(|&n| self.owner_of(n) == player).collect()
    }

    /// Territories of `player` touching at least one territory it does not own.
    /// With `include_neutrals = false`, only enemy-owned neighbours count.
    pub fn borders(&self, player: PlayerId, include_neutrals: bool) -> Vec<NodeId> {
        self.nodes()
            .filter(|&src| self.owner_of(src) == player)
            .filter(|&src| {
                self.graph.neighbors(src).iter().any(|&dst| {
                    let o = self.owner_of(dst);
                    o != player && (include_neutrals || !o.is_neutral())
                })
            })
            .collect()
    }

    /// Base income plus the value of every bonus region fully owned by `player`.
    /// Saturates at the `i32` bounds.
    pub fn income(&self, player: PlayerId) -> i32 {
        self.graph.bonuses().iter()
            .filter(|b| b.owned_by(&self.owner, player))
            .fold(BASE_INCOME, |total, b| total.saturating_add(b.value))
    }

    pub fn total_armies(&self, player: PlayerId) -> i64 {
        self.armies.iter().zip(&self.owner)
            .filter(|(_, &o)| o == player)
            .map(|(&a, _)| i64::from(a))
            .sum()
    }

    /// Distinct non-neutral owners currently on the board, ascending.
    pub fn players(&self) -> Vec<PlayerId> {
        let mut players: Vec<PlayerId> = self.owner.iter()
            .copied()
            .filter(|o| !o.is_neutral())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        players.sort_unstable();
        players
    }

    /// The only non-neutral owner left on the board. `None` both when the
    /// board is split between players and when every territory is neutral.
    pub fn winner(&self) -> Option<PlayerId> {
        let mut winner = None;
        for &o in self.owner.iter().filter(|o| !o.is_neutral()) {
            match winner {
                None => winner = Some(o),
                Some(w) if w != o => return None,
                Some(_) => {}
            }
        }
        winner
    }

    pub fn copy(&self) -> GameState {
        self.clone()
    }

    pub fn assert_valid(&self) -> Result<(), InvalidStateError> {
        let nodes = self.graph.node_count();
        if self.armies.len() != nodes || self.owner.len() != nodes {
            return Err(InvalidStateError::LengthMismatch {
                armies: self.armies.len(),
                owners: self.owner.len(),
                nodes,
            });
        }
        if let Some((i, &armies)) = self.armies.iter().enumerate().find(|(_, &a)| a < 0) {
            return Err(InvalidStateError::NegativeArmies { node: NodeId::from_index(i), armies });
        }
        Ok(())
    }
}
