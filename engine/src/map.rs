// ═══════════════════════════════════════════════════════════════════════
// Territory graph — immutable board structure
// Territories, undirected adjacency and scored bonus regions.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::MalformedGraphError;
use crate::types::{Bonus, ExternalId, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw graph input, in internal ids. Consumed once by [`TerritoryGraph::new`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDescription {
    pub map_id: u64,
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<(NodeId, NodeId)>,
    pub bonuses: Vec<Bonus>,
}

/// Static board description. Never mutated after construction; game states
/// share it through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoryGraph {
    map_id: u64,
    name: String,
    nodes: Vec<Node>,
    adjacent: Vec<Vec<NodeId>>,
    bonuses: Vec<Bonus>,
    by_external: HashMap<ExternalId, NodeId>,
}

impl TerritoryGraph {
    pub fn new(desc: GraphDescription) -> Result<Self, MalformedGraphError> {
        let node_count = desc.nodes.len();
        if node_count > NodeId::MAX_NODES {
            return Err(MalformedGraphError::TooManyNodes { count: node_count, max: NodeId::MAX_NODES });
        }

        let mut by_external = HashMap::with_capacity(node_count);
        for (position, node) in desc.nodes.iter().enumerate() {
            if node.id.index() != position {
                return Err(MalformedGraphError::NonContiguousIds { position, found: node.id });
            }
            if by_external.insert(node.external_id, node.id).is_some() {
                return Err(MalformedGraphError::DuplicateExternalId(node.external_id));
            }
        }

        let mut adjacent: Vec<Vec<NodeId>> = vec![Vec::new(); node_count];
        for &(from, to) in &desc.edges {
            if from.index() >= node_count || to.index() >= node_count {
                return Err(MalformedGraphError::UnknownEdgeNode { from, to, node_count });
            }
            if from == to {
                return Err(MalformedGraphError::SelfLoop(from));
            }
            adjacent[from.index()].push(to);
            adjacent[to.index()].push(from);
        }
        for list in &mut adjacent {
            list.sort_unstable();
            list.dedup();
        }

        let mut bonuses = Vec::with_capacity(desc.bonuses.len());
        for bonus in desc.bonuses {
            if let Some(&node) = bonus.nodes.iter().find(|n| n.index() >= node_count) {
                return Err(MalformedGraphError::UnknownBonusNode { bonus: bonus.name, node, node_count });
            }
            // Zero-value regions have no game effect.
            if bonus.value != 0 {
                bonuses.push(Bonus::new(bonus.name, bonus.nodes, bonus.value));
            }
        }

        Ok(TerritoryGraph {
            map_id: desc.map_id,
            name: desc.name,
            nodes: desc.nodes,
            adjacent,
            bonuses,
            by_external,
        })
    }

    pub fn map_id(&self) -> u64 { self.map_id }
    pub fn name(&self) -> &str { &self.name }
    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn nodes(&self) -> &[Node] { &self.nodes }
    pub fn bonuses(&self) -> &[Bonus] { &self.bonuses }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Adjacent territories, sorted ascending. Empty for unknown ids.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacent.get(node.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Internal → hosting-service territory id.
    pub fn external_id(&self, node: NodeId) -> Option<ExternalId> {
        self.node(node).map(|n| n.external_id)
    }

    /// Hosting-service → internal territory id. Exact inverse of [`Self::external_id`].
    pub fn node_for_external(&self, id: ExternalId) -> Option<NodeId> {
        self.by_external.get(&id).copied()
    }

    pub fn display_name(&self, node: NodeId) -> &str {
        self.node(node).map_or("?", |n| n.name.as_str())
    }
}

// ── Sample map ─────────────────────────────────────────────────────────
// Twelve territories in four regions. Used by tests and as the CLI default.

const SAMPLE_TERRITORIES: [&str; 12] = [
    "North Reach", "Frost Hollow", "Pine Ridge",
    "Greyford", "Millbrook", "Stonebridge",
    "Saltmarsh", "Gull Point", "Harbor Watch",
    "Dunmere", "Red Sands", "Sunspire",
];

const SAMPLE_EDGES: [(u16, u16); 18] = [
    (0, 1), (0, 2), (1, 2), (2, 3), (1, 4), (3, 4),
    (3, 5), (4, 5), (4, 6), (5, 7), (6, 7), (6, 8),
    (7, 8), (5, 9), (8, 10), (9, 10), (9, 11), (10, 11),
];

const SAMPLE_BONUSES: [(&str, [u16; 3], i32); 4] = [
    ("Northlands", [0, 1, 2], 2),
    ("Midlands", [3, 4, 5], 3),
    ("Coast", [6, 7, 8], 2),
    ("Southlands", [9, 10, 11], 2),
];

pub fn sample_description() -> GraphDescription {
    let nodes = SAMPLE_TERRITORIES.iter().enumerate()
        .map(|(i, name)| Node {
            id: NodeId(i as u16),
            name: (*name).to_string(),
            external_id: ExternalId(i as u32 + 1),
        })
        .collect();
    let edges = SAMPLE_EDGES.iter()
        .map(|&(a, b)| (NodeId(a), NodeId(b)))
        .collect();
    let bonuses = SAMPLE_BONUSES.iter()
        .map(|(name, nodes, value)| Bonus::new(*name, nodes.iter().map(|&n| NodeId(n)), *value))
        .collect();
    GraphDescription { map_id: 1, name: "Sample".to_string(), nodes, edges, bonuses }
}

pub fn sample_map() -> Result<TerritoryGraph, MalformedGraphError> {
    TerritoryGraph::new(sample_description())
}
