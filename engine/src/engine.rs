// ═══════════════════════════════════════════════════════════════════════
// Turn resolution — applies one turn's orders from every player
//
// Architecture:
//   The resolver is a pure function of (state, orders). It never calls
//   agents or does I/O. Orders run strictly in sequence because later
//   orders observe ownership and army changes made by earlier ones.
//
// Flow:
//   1. Stable-sort the batch by priority (deploys first, ties keep
//      submission order)
//   2. Validate each order against the current, partially resolved state
//   3. Apply it; the first invalid order aborts the whole turn
//   4. Check state invariants on the final state and hand it back
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{ApplyError, ResolveError};
use crate::orders::{Order, OrderOutcome};
use crate::state::GameState;

/// Final state of a turn plus what each order did, in execution order.
#[derive(Debug, Clone)]
pub struct TurnResolution {
    pub state: GameState,
    /// `(submission index, order, outcome)`
    pub outcomes: Vec<(usize, Order, OrderOutcome)>,
}

/// Resolve a batch of orders against `state` and return the next state.
/// `state` itself is never modified.
pub fn resolve_turn(state: &GameState, orders: &[Order]) -> Result<GameState, ResolveError> {
    resolve_turn_detailed(state, orders).map(|r| r.state)
}

pub fn resolve_turn_detailed(state: &GameState, orders: &[Order]) -> Result<TurnResolution, ResolveError> {
    let mut next = state.copy();
    next.assert_valid()?;

    let mut sequence: Vec<usize> = (0..orders.len()).collect();
    // `sort_by_key` is stable.
    sequence.sort_by_key(|&i| orders[i].priority());

    let mut outcomes = Vec::with_capacity(orders.len());
    for index in sequence {
        let order = orders[index];
        let outcome = order.apply_in_place(&mut next).map_err(|e| match e {
            ApplyError::InvalidOrder(error) => ResolveError::InvalidOrder { index, error },
            ApplyError::InvalidState(e) => ResolveError::InvalidState(e),
        })?;
        tracing::debug!(index, %order, ?outcome, "order applied");
        outcomes.push((index, order, outcome));
    }

    next.assert_valid()?;
    Ok(TurnResolution { state: next, outcomes })
}
