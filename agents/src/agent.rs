// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface that all order-producing players implement
//
// An agent sees the full pre-turn state and returns its orders for the
// turn. It never applies them itself: the batch from every agent goes to
// the turn resolver together.
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::{GameState, Order, PlayerId};

pub trait Agent: Send {
    /// Human-readable name for this agent (e.g., "Random").
    fn name(&self) -> &str;

    /// The player this agent controls.
    fn player(&self) -> PlayerId;

    /// Orders for the coming turn, in submission order.
    fn orders(&mut self, state: &GameState) -> Vec<Order>;
}
