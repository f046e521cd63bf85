// ═══════════════════════════════════════════════════════════════════════
// Core types — identifiers, territories and bonus regions
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

// ── Identifiers ────────────────────────────────────────────────────────

/// Dense, 0-based territory index. Stable for the lifetime of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u16);

impl NodeId {
    /// Most nodes a graph can hold: one per `u16` value.
    pub const MAX_NODES: usize = u16::MAX as usize + 1;

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn try_from_index(index: usize) -> Option<NodeId> {
        u16::try_from(index).ok().map(NodeId)
    }

    /// For indices of a constructed graph, which are always below `MAX_NODES`.
    pub(crate) fn from_index(index: usize) -> NodeId {
        debug_assert!(index < Self::MAX_NODES);
        NodeId(index as u16)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Territory id as known to the hosting service. Only used at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ExternalId(pub u32);

/// Player id. `PlayerId(0)` is the neutral owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord, Default)]
pub struct PlayerId(pub u64);

impl PlayerId {
    pub const NEUTRAL: PlayerId = PlayerId(0);

    pub fn is_neutral(self) -> bool {
        self == PlayerId::NEUTRAL
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_neutral() {
            write!(f, "Neutral")
        } else {
            write!(f, "P{}", self.0)
        }
    }
}

// ── Territory ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub external_id: ExternalId,
}

// ── Bonus region ───────────────────────────────────────────────────────

/// Named set of territories that grants `value` extra income when a single
/// player owns all of them. `value` may be negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub name: String,
    pub nodes: Vec<NodeId>,
    pub value: i32,
}

impl Bonus {
    pub fn new(name: impl Into<String>, nodes: impl IntoIterator<Item = NodeId>, value: i32) -> Self {
        let mut nodes: Vec<NodeId> = nodes.into_iter().collect();
        nodes.sort_unstable();
        nodes.dedup();
        Bonus { name: name.into(), nodes, value }
    }

    /// True if every territory of the region is owned by `player`.
    /// An empty region is vacuously owned.
    pub fn owned_by(&self, owners: &[PlayerId], player: PlayerId) -> bool {
        self.nodes.iter().all(|n| owners[n.index()] == player)
    }
}
