/// Conflict resolution for replicated operations.
///
/// For a pair of writes to the same key, the per-key clock decides:
/// a strictly dominating stamp wins, a dominated or equal stamp is
/// discarded, and concurrent stamps fall through to a deterministic
/// tiebreak on the proposed value so every node converges to the same
/// answer without coordination.
use crate::clock::VectorClock;
use crate::op::Operation;

/// Whether `op` becomes visible over the key's current state.
///
/// `current` is the clock recorded for the key (absent when the key has
/// never been seen). `current_value` is the live data value, or the
/// empty string when the key is absent (including after a delete), so a
/// concurrent non-empty set always beats a delete.
pub(crate) fn should_apply(
    current: Option<&VectorClock>,
    current_value: &str,
    op: &Operation,
) -> bool {
    let Some(current) = current else {
        // First operation ever seen for this key.
        return true;
    };

    let mut incoming_newer = false;
    let mut current_newer = false;
    for (node, theirs) in op.stamp.iter() {
        let ours = current.get(node);
        if ours < theirs {
            incoming_newer = true;
        } else if ours > theirs {
            current_newer = true;
        }
    }
    // A component known only to the current clock also makes it newer.
    if current.iter().any(|(node, _)| !op.stamp.contains(node)) {
        current_newer = true;
    }

    match (incoming_newer, current_newer) {
        // Incoming strictly dominates.
        (true, false) => true,
        // Current dominates, or the stamps are equal (idempotent replay).
        (false, _) => false,
        // Concurrent: the lexicographically larger value wins.
        (true, true) => op.value.as_str() > current_value,
    }
}
