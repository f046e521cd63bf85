// ═══════════════════════════════════════════════════════════════════════
// Orders — Deploy and Attack/Transfer
//
// Every order carries three things: a priority (lower runs first), a
// validation rule checked against the state it is about to run on, and a
// state transformation. Ownership of an attack's source is decided at
// execution time, not at validation time.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{ApplyError, InvalidOrderError, InvalidStateError, OrderViolation};
use crate::state::GameState;
use crate::types::{NodeId, PlayerId};
use serde::{Deserialize, Serialize};

pub const DEPLOY_PRIORITY: u8 = 25;
pub const ATTACK_TRANSFER_PRIORITY: u8 = 50;

/// Add reinforcements to a territory the player owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deploy {
    pub player: PlayerId,
    pub target: NodeId,
    pub armies: i32,
}

/// Move armies from `src` to the adjacent `dst`: a transfer if both are
/// owned by the same player when the order runs, an attack otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackTransfer {
    pub player: PlayerId,
    pub src: NodeId,
    pub dst: NodeId,
    pub armies: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Deploy(Deploy),
    AttackTransfer(AttackTransfer),
}

/// What executing an order did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderOutcome {
    Deployed { target: NodeId, armies: i32 },
    Transferred { src: NodeId, dst: NodeId, moved: i32 },
    Conquered { src: NodeId, dst: NodeId, attackers_lost: i32, survivors: i32 },
    Repelled { src: NodeId, dst: NodeId, attackers_lost: i32, defenders_left: i32 },
    /// The player no longer owned the source territory.
    SourceLost { src: NodeId },
}

// ── Combat ─────────────────────────────────────────────────────────────

/// Round half up: `floor(x + 0.5)`. Not banker's rounding, not truncation.
fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}

/// Survivors `(attacker, defender)` after `attack` armies hit `defend` armies.
/// Each attacking army kills 0.6 defenders, each defending army kills 0.7
/// attackers. Either result may be negative.
pub fn combat(attack: i32, defend: i32) -> (i32, i32) {
    let attack = f64::from(attack);
    let defend = f64::from(defend);
    (
        round_half_up(attack - defend * 0.7),
        round_half_up(defend - attack * 0.6),
    )
}

// ── Constructors ───────────────────────────────────────────────────────

impl Order {
    pub fn deploy(player: PlayerId, target: NodeId, armies: i32) -> Self {
        Order::Deploy(Deploy { player, target, armies })
    }

    pub fn attack_transfer(player: PlayerId, src: NodeId, dst: NodeId, armies: i32) -> Self {
        Order::AttackTransfer(AttackTransfer { player, src, dst, armies })
    }

    pub fn player(&self) -> PlayerId {
        match self {
            Order::Deploy(d) => d.player,
            Order::AttackTransfer(a) => a.player,
        }
    }

    pub fn armies(&self) -> i32 {
        match self {
            Order::Deploy(d) => d.armies,
            Order::AttackTransfer(a) => a.armies,
        }
    }

    /// Ascending sort key: deploys resolve before attacks and transfers.
    pub fn priority(&self) -> u8 {
        match self {
            Order::Deploy(_) => DEPLOY_PRIORITY,
            Order::AttackTransfer(_) => ATTACK_TRANSFER_PRIORITY,
        }
    }

    // ── Validation ─────────────────────────────────────────────────────

    /// Check the order against `state` without touching it.
    ///
    /// A Deploy is capped by the player's income in `state` alone; several
    /// deploys in one batch are not checked against a shared budget.
    pub fn validate(&self, state: &GameState) -> Result<(), InvalidOrderError> {
        self.violation(state).map_or(Ok(()), |violation| {
            Err(InvalidOrderError { order: *self, violation })
        })
    }

    fn violation(&self, state: &GameState) -> Option<OrderViolation> {
        let graph = state.graph();
        match *self {
            Order::Deploy(Deploy { player, target, armies }) => {
                if !graph.contains(target) {
                    return Some(OrderViolation::UnknownNode(target));
                }
                if armies <= 0 {
                    return Some(OrderViolation::NonPositiveArmies(armies));
                }
                let income = state.income(player);
                if armies > income {
                    return Some(OrderViolation::ExceedsIncome { armies, income });
                }
                let owner = state.owner_of(target);
                if owner != player {
                    return Some(OrderViolation::NotOwner { node: target, owner });
                }
                None
            }
            Order::AttackTransfer(AttackTransfer { src, dst, armies, .. }) => {
                if let Some(&unknown) = [src, dst].iter().find(|n| !graph.contains(**n)) {
                    return Some(OrderViolation::UnknownNode(unknown));
                }
                if armies <= 0 {
                    return Some(OrderViolation::NonPositiveArmies(armies));
                }
                if !graph.is_adjacent(src, dst) {
                    return Some(OrderViolation::NotAdjacent { src, dst });
                }
                None
            }
        }
    }

    // ── Execution ──────────────────────────────────────────────────────

    /// Pure application: validates, then runs on a copy of `state`.
    pub fn apply(&self, state: &GameState) -> Result<GameState, ApplyError> {
        let mut next = state.copy();
        self.apply_in_place(&mut next)?;
        Ok(next)
    }

    /// Validate and execute on `state`, checking state invariants before and
    /// after. A failed validation or an army overflow leaves `state` untouched.
    pub fn apply_in_place(&self, state: &mut GameState) -> Result<OrderOutcome, ApplyError> {
        self.validate(state)?;
        state.assert_valid()?;
        let outcome = self.execute(state)?;
        state.assert_valid()?;
        Ok(outcome)
    }

    fn execute(&self, state: &mut GameState) -> Result<OrderOutcome, InvalidStateError> {
        match *self {
            Order::Deploy(Deploy { target, armies, .. }) => {
                state.set_armies(target, add_armies(state, target, armies)?);
                Ok(OrderOutcome::Deployed { target, armies })
            }
            Order::AttackTransfer(at) => at.execute(state),
        }
    }
}

fn add_armies(state: &GameState, node: NodeId, armies: i32) -> Result<i32, InvalidStateError> {
    state.armies_at(node).checked_add(armies).ok_or(InvalidStateError::ArmyOverflow { node })
}

impl AttackTransfer {
    fn execute(&self, state: &mut GameState) -> Result<OrderOutcome, InvalidStateError> {
        let AttackTransfer { player, src, dst, armies } = *self;

        if state.owner_of(src) != player {
            return Ok(OrderOutcome::SourceLost { src });
        }

        let available = state.armies_at(src);
        if state.owner_of(src) == state.owner_of(dst) {
            let moved = armies.min(available);
            let arrived = add_armies(state, dst, moved)?;
            state.set_armies(src, available - moved);
            state.set_armies(dst, arrived);
            return Ok(OrderOutcome::Transferred { src, dst, moved });
        }

        let attack = armies.min(available);
        let defend = state.armies_at(dst);
        let (attack_survive, defend_survive) = combat(attack, defend);
        tracing::trace!(%src, %dst, attack, defend, attack_survive, defend_survive, "combat");

        if attack_survive > 0 && defend_survive <= 0 {
            state.set_armies(src, available - attack);
            state.set_armies(dst, attack_survive);
            state.set_owner(dst, player);
            Ok(OrderOutcome::Conquered { src, dst, attackers_lost: attack - attack_survive, survivors: attack_survive })
        } else {
            let attack_survive = attack_survive.max(0);
            let defenders_left = defend_survive.max(0);
            state.set_armies(src, available - (attack - attack_survive));
            state.set_armies(dst, defenders_left);
            Ok(OrderOutcome::Repelled { src, dst, attackers_lost: attack - attack_survive, defenders_left })
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Deploy(d) => write!(f, "{} deploys {} on {}", d.player, d.armies, d.target),
            Order::AttackTransfer(a) => write!(f, "{} moves {} from {} to {}", a.player, a.armies, a.src, a.dst),
        }
    }
}
