// ═══════════════════════════════════════════════════════════════════════
// Order aggregation — collapse per-army picks into one order per key
//
// Agents often decide one army at a time ("this army goes there"). The
// resolver expects one order per territory (or per edge), so the picks are
// counted here before the batch is submitted.
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::{NodeId, Order, PlayerId};
use std::collections::BTreeMap;

/// One Deploy per distinct target; each target's army count is how often it
/// appears in `targets`. Orders come out sorted by target.
pub fn collect_deploys(player: PlayerId, targets: impl IntoIterator<Item = NodeId>) -> Vec<Order> {
    let mut counts: BTreeMap<NodeId, i32> = BTreeMap::new();
    for target in targets {
        *counts.entry(target).or_insert(0) += 1;
    }
    counts.into_iter()
        .map(|(target, armies)| Order::deploy(player, target, armies))
        .collect()
}

/// One AttackTransfer per distinct `(src, dst)` pair, sorted by pair.
pub fn collect_attacks(player: PlayerId, moves: impl IntoIterator<Item = (NodeId, NodeId)>) -> Vec<Order> {
    let mut counts: BTreeMap<(NodeId, NodeId), i32> = BTreeMap::new();
    for edge in moves {
        *counts.entry(edge).or_insert(0) += 1;
    }
    counts.into_iter()
        .map(|((src, dst), armies)| Order::attack_transfer(player, src, dst, armies))
        .collect()
}
