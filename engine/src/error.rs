//! Error taxonomy for graph construction, state validation and order resolution.

use crate::orders::Order;
use crate::types::{ExternalId, NodeId, PlayerId};
use thiserror::Error;

/// Structural input that is internally inconsistent. No partial graph is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedGraphError {
    #[error("edge ({from}, {to}) references a node outside 0..{node_count}")]
    UnknownEdgeNode { from: NodeId, to: NodeId, node_count: usize },

    #[error("edge on {0} connects the node to itself")]
    SelfLoop(NodeId),

    #[error("bonus '{bonus}' references {node}, outside 0..{node_count}")]
    UnknownBonusNode { bonus: String, node: NodeId, node_count: usize },

    #[error("node at position {position} has id {found}; ids must be the contiguous range 0..n")]
    NonContiguousIds { position: usize, found: NodeId },

    #[error("external id {0:?} is used by more than one node")]
    DuplicateExternalId(ExternalId),

    #[error("{count} nodes exceed the limit of {max}")]
    TooManyNodes { count: usize, max: usize },
}

/// Army/owner arrays violate the state invariants. A state failing this is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStateError {
    #[error("{node} has negative army count {armies}")]
    NegativeArmies { node: NodeId, armies: i32 },

    #[error("state arrays have lengths armies={armies}, owner={owners}; graph has {nodes} nodes")]
    LengthMismatch { armies: usize, owners: usize, nodes: usize },

    #[error("snapshot does not cover the graph exactly: {0}")]
    SnapshotMismatch(String),

    #[error("army count on {node} would overflow")]
    ArmyOverflow { node: NodeId },
}

/// The specific validation clause an order failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderViolation {
    #[error("{0} is not a node of this map")]
    UnknownNode(NodeId),

    #[error("army count {0} is not positive")]
    NonPositiveArmies(i32),

    #[error("deploying {armies} exceeds income {income}")]
    ExceedsIncome { armies: i32, income: i32 },

    #[error("{node} is owned by {owner}, not the deploying player")]
    NotOwner { node: NodeId, owner: PlayerId },

    #[error("{dst} is not adjacent to {src}")]
    NotAdjacent { src: NodeId, dst: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order {order:?}: {violation}")]
pub struct InvalidOrderError {
    pub order: Order,
    pub violation: OrderViolation,
}

/// Failure while resolving a whole turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// `index` is the order's position in the submitted batch.
    #[error("order {index} rejected: {error}")]
    InvalidOrder { index: usize, error: InvalidOrderError },

    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),
}

/// Failure while applying one order outside of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error(transparent)]
    InvalidOrder(#[from] InvalidOrderError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),
}
