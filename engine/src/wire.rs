//! Conversion between engine types and the hosting service's JSON payloads.
//!
//! Three payloads cross this boundary: the map details (territories, their
//! connections and bonuses), the latest standing (armies and owner per
//! territory) and order records. Territory ids on the wire are the service's
//! own ids; everything inside the engine uses dense [`NodeId`]s.

use crate::error::{InvalidStateError, MalformedGraphError};
use crate::map::{GraphDescription, TerritoryGraph};
use crate::orders::{AttackTransfer, Deploy, Order};
use crate::state::{GameState, TerritorySnapshot};
use crate::types::{Bonus, ExternalId, Node, NodeId, PlayerId};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

const NEUTRAL_OWNER: &str = "Neutral";

#[derive(Debug, Error)]
pub enum WireError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("territory id {0} is not on this map")]
    UnknownTerritory(u32),

    #[error("{0} has no external id on this map")]
    UnknownNode(NodeId),

    #[error("owner '{0}' is neither 'Neutral' nor a player id")]
    BadOwner(String),

    #[error("army count '{0}' is not an integer")]
    BadArmies(String),

    #[error(transparent)]
    Graph(#[from] MalformedGraphError),

    #[error(transparent)]
    State(#[from] InvalidStateError),
}

// ── Lenient numbers ────────────────────────────────────────────────────
// The service sends some integers as JSON numbers and some as strings.

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + FromStr,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => T::try_from(n).map_err(|_| de::Error::custom(format!("{n} is out of range"))),
        NumberOrText::Text(s) => s.trim().parse().map_err(|_| de::Error::custom(format!("'{s}' is not an integer"))),
    }
}

// ── Map details ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDetails {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    pub name: String,
    pub territories: Vec<WireTerritory>,
    #[serde(default)]
    pub bonuses: Vec<WireBonus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTerritory {
    #[serde(deserialize_with = "lenient")]
    pub id: u32,
    pub name: String,
    #[serde(rename = "connectedTo", default)]
    pub connected_to: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireBonus {
    pub name: String,
    #[serde(rename = "territoryIDs")]
    pub territory_ids: Vec<u32>,
    #[serde(deserialize_with = "lenient")]
    pub value: i32,
}

/// Build the graph. Internal ids follow the order territories are listed in.
pub fn map_details_to_graph(details: &MapDetails) -> Result<TerritoryGraph, WireError> {
    let count = details.territories.len();
    let too_many = MalformedGraphError::TooManyNodes { count, max: NodeId::MAX_NODES };
    let mut to_node: HashMap<u32, NodeId> = HashMap::with_capacity(count);
    let mut nodes: Vec<Node> = Vec::with_capacity(count);
    for (i, t) in details.territories.iter().enumerate() {
        let id = NodeId::try_from_index(i).ok_or_else(|| too_many.clone())?;
        to_node.insert(t.id, id);
        nodes.push(Node { id, name: t.name.clone(), external_id: ExternalId(t.id) });
    }

    let lookup = |ext: u32| to_node.get(&ext).copied().ok_or(WireError::UnknownTerritory(ext));

    let mut edges = Vec::new();
    for (node, t) in nodes.iter().zip(&details.territories) {
        for &dst in &t.connected_to {
            edges.push((node.id, lookup(dst)?));
        }
    }

    let bonuses = details.bonuses.iter()
        .map(|b| {
            let nodes = b.territory_ids.iter().map(|&t| lookup(t)).collect::<Result<Vec<_>, _>>()?;
            Ok(Bonus::new(b.name.clone(), nodes, b.value))
        })
        .collect::<Result<Vec<_>, WireError>>()?;

    Ok(TerritoryGraph::new(GraphDescription {
        map_id: details.id,
        name: details.name.clone(),
        nodes,
        edges,
        bonuses,
    })?)
}

pub fn graph_from_json(json: &str) -> Result<TerritoryGraph, WireError> {
    let details: MapDetails = serde_json::from_str(json)?;
    map_details_to_graph(&details)
}

// ── Standing ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTerritoryStanding {
    #[serde(rename = "terrID", deserialize_with = "lenient")]
    pub terr_id: u32,
    #[serde(deserialize_with = "lenient")]
    pub armies: i32,
    #[serde(rename = "ownedBy")]
    pub owned_by: String,
}

pub fn parse_owner(owned_by: &str) -> Result<PlayerId, WireError> {
    if owned_by == NEUTRAL_OWNER {
        return Ok(PlayerId::NEUTRAL);
    }
    owned_by.trim().parse().map(PlayerId).map_err(|_| WireError::BadOwner(owned_by.to_string()))
}

pub fn format_owner(owner: PlayerId) -> String {
    if owner.is_neutral() { NEUTRAL_OWNER.to_string() } else { owner.0.to_string() }
}

/// Build a state from the service's standing. Every territory must appear once.
pub fn standing_to_state(
    graph: Arc<TerritoryGraph>,
    standing: &[WireTerritoryStanding],
) -> Result<GameState, WireError> {
    let snapshot = standing.iter()
        .map(|t| {
            let node = graph.node_for_external(ExternalId(t.terr_id)).ok_or(WireError::UnknownTerritory(t.terr_id))?;
            Ok(TerritorySnapshot { node, armies: t.armies, owner: parse_owner(&t.owned_by)? })
        })
        .collect::<Result<Vec<_>, WireError>>()?;
    Ok(GameState::from_snapshot(graph, &snapshot)?)
}

pub fn state_from_json(graph: Arc<TerritoryGraph>, json: &str) -> Result<GameState, WireError> {
    let standing: Vec<WireTerritoryStanding> = serde_json::from_str(json)?;
    standing_to_state(graph, &standing)
}

pub fn state_to_standing(state: &GameState) -> Result<Vec<WireTerritoryStanding>, WireError> {
    let graph = state.graph();
    state.snapshot().into_iter()
        .map(|t| {
            let ExternalId(terr_id) = graph.external_id(t.node).ok_or(WireError::UnknownNode(t.node))?;
            Ok(WireTerritoryStanding { terr_id, armies: t.armies, owned_by: format_owner(t.owner) })
        })
        .collect()
}

// ── Orders ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireOrder {
    GameOrderDeploy {
        #[serde(rename = "playerID")]
        player_id: u64,
        armies: String,
        #[serde(rename = "deployOn")]
        deploy_on: u32,
    },
    GameOrderAttackTransfer {
        #[serde(rename = "playerID")]
        player_id: u64,
        from: u32,
        to: u32,
        #[serde(rename = "numArmies")]
        num_armies: String,
        #[serde(rename = "attackTeammates", default = "attack_teammates")]
        attack_teammates: bool,
    },
}

fn attack_teammates() -> bool {
    true
}

fn external(graph: &TerritoryGraph, node: NodeId) -> Result<u32, WireError> {
    graph.external_id(node).map(|e| e.0).ok_or(WireError::UnknownNode(node))
}

fn internal(graph: &TerritoryGraph, id: u32) -> Result<NodeId, WireError> {
    graph.node_for_external(ExternalId(id)).ok_or(WireError::UnknownTerritory(id))
}

fn parse_armies(text: &str) -> Result<i32, WireError> {
    text.trim().parse().map_err(|_| WireError::BadArmies(text.to_string()))
}

pub fn encode_order(graph: &TerritoryGraph, order: &Order) -> Result<WireOrder, WireError> {
    Ok(match *order {
        Order::Deploy(Deploy { player, target, armies }) => WireOrder::GameOrderDeploy {
            player_id: player.0,
            armies: armies.to_string(),
            deploy_on: external(graph, target)?,
        },
        Order::AttackTransfer(AttackTransfer { player, src, dst, armies }) => WireOrder::GameOrderAttackTransfer {
            player_id: player.0,
            from: external(graph, src)?,
            to: external(graph, dst)?,
            num_armies: armies.to_string(),
            attack_teammates: true,
        },
    })
}

pub fn encode_orders(graph: &TerritoryGraph, orders: &[Order]) -> Result<Vec<WireOrder>, WireError> {
    orders.iter().map(|o| encode_order(graph, o)).collect()
}

pub fn decode_order(graph: &TerritoryGraph, wire: &WireOrder) -> Result<Order, WireError> {
    Ok(match wire {
        WireOrder::GameOrderDeploy { player_id, armies, deploy_on } => {
            Order::deploy(PlayerId(*player_id), internal(graph, *deploy_on)?, parse_armies(armies)?)
        }
        WireOrder::GameOrderAttackTransfer { player_id, from, to, num_armies, .. } => Order::attack_transfer(
            PlayerId(*player_id),
            internal(graph, *from)?,
            internal(graph, *to)?,
            parse_armies(num_armies)?,
        ),
    })
}

pub fn orders_from_json(graph: &TerritoryGraph, json: &str) -> Result<Vec<Order>, WireError> {
    let wire: Vec<WireOrder> = serde_json::from_str(json)?;
    wire.iter().map(|w| decode_order(graph, w)).collect()
}
