/// Logical time for causal ordering.
///
/// Every node stamps its local mutations with a copy of its vector clock
/// and advances the clock past every stamp it learns through gossip.
/// Comparing two stamps component-wise recovers the happens-before
/// relation; stamps that are newer in different components are concurrent
/// and fall through to the merger's tiebreak.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a cluster member: an index into the cluster table.
pub type NodeId = u32;

/// Vector clock mapping node ids to monotonic counters.
///
/// A missing entry reads as 0; present entries are always at least 1.
/// Serialized transparently as a JSON object. JSON object keys are
/// strings, so the counters travel with decimal-string keys on the wire
/// and come back as integer `NodeId`s on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorClock {
    clocks: HashMap<NodeId, u64>,
}

impl VectorClock {
    /// Create an empty vector clock.
    pub fn new() -> Self {
        Self {
            clocks: HashMap::new(),
        }
    }

    /// Current counter for `node`, 0 when absent.
    pub fn get(&self, node: NodeId) -> u64 {
        self.clocks.get(&node).copied().unwrap_or(0)
    }

    /// Whether `node` has an explicit entry.
    pub fn contains(&self, node: NodeId) -> bool {
        self.clocks.contains_key(&node)
    }

    /// Advance `node`'s component by 1, creating it at 1.
    ///
    /// Returns the new counter value.
    pub fn tick(&mut self, node: NodeId) -> u64 {
        let entry = self.clocks.entry(node).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Merge `other` into this clock, taking the element-wise maximum.
    pub fn absorb(&mut self, other: &VectorClock) {
        for (&node, &t) in &other.clocks {
            let entry = self.clocks.entry(node).or_insert(0);
            *entry = (*entry).max(t);
        }
    }

    /// Iterate over `(node, counter)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, u64)> + '_ {
        self.clocks.iter().map(|(&node, &t)| (node, t))
    }

    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }
}

impl FromIterator<(NodeId, u64)> for VectorClock {
    fn from_iter<I: IntoIterator<Item = (NodeId, u64)>>(iter: I) -> Self {
        Self {
            clocks: iter.into_iter().collect(),
        }
    }
}
