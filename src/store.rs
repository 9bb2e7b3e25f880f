/// In-memory node state.
///
/// The store owns everything mutable on a node: the visible data map,
/// the per-key clocks that carry replication metadata, the node's own
/// vector clock, the append-only operation log, and the peer blacklist.
/// A single mutex (`SharedStore`) serializes every operation; critical
/// sections are synchronous and never span network I/O.
///
/// Replaying the full log in order against an empty store reproduces the
/// live `(data, per-key clocks)` state.
use crate::clock::{NodeId, VectorClock};
use crate::merge;
use crate::op::{OpKind, Operation};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Handle shared by the transport handlers and the gossip task.
pub type SharedStore = Arc<Mutex<Store>>;

/// Copies of a node's internal state, in the `/snapshot` wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Visible key-value data.
    pub data: HashMap<String, String>,
    /// Per-key clocks.
    pub data_ts: HashMap<String, VectorClock>,
    /// The node's current clock.
    pub cur_ts: VectorClock,
}

#[derive(Debug)]
pub struct Store {
    node_id: NodeId,
    data: HashMap<String, String>,
    key_clocks: HashMap<String, VectorClock>,
    local_clock: VectorClock,
    log: Vec<Operation>,
    blacklist: HashSet<NodeId>,
}

impl Store {
    /// Create an empty store for `node_id`.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            data: HashMap::new(),
            key_clocks: HashMap::new(),
            local_clock: VectorClock::new(),
            log: Vec::new(),
            blacklist: HashSet::new(),
        }
    }

    /// Create an empty store behind the shared mutex.
    pub fn shared(node_id: NodeId) -> SharedStore {
        Arc::new(Mutex::new(Self::new(node_id)))
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Record a client write: tick the local clock, stamp the operation
    /// with a copy of it, and apply through the merger.
    ///
    /// The stamp is this node's clock cloned at tick time; later writes
    /// in the same request must not mutate earlier stamps. An empty
    /// value deletes the key.
    pub fn write(&mut self, key: impl Into<String>, value: impl Into<String>) -> Operation {
        self.local_clock.tick(self.node_id);
        let op = Operation::from_client(key, value, self.node_id, self.local_clock.clone());
        self.apply(op.clone());
        op
    }

    /// Run one operation through the conflict-resolution rule.
    ///
    /// Returns whether the operation became visible. Applied operations
    /// mutate the data map, fold their stamp into the per-key clock, and
    /// are appended to the log.
    pub fn apply(&mut self, op: Operation) -> bool {
        let current_value = self.data.get(&op.key).map(String::as_str).unwrap_or("");
        if !merge::should_apply(self.key_clocks.get(&op.key), current_value, &op) {
            return false;
        }

        match op.kind {
            OpKind::Set => {
                self.data.insert(op.key.clone(), op.value.clone());
            }
            OpKind::Del => {
                self.data.remove(&op.key);
            }
        }
        // The stamp is absorbed, not assigned: components contributed by
        // other nodes earlier stay in place. The entry survives deletes
        // so the delete keeps dominating older sets.
        self.key_clocks
            .entry(op.key.clone())
            .or_default()
            .absorb(&op.stamp);
        self.log.push(op);
        true
    }

    /// Advance the local clock past an incoming stamp.
    pub fn absorb(&mut self, stamp: &VectorClock) {
        self.local_clock.absorb(stamp);
    }

    /// Copy of the visible data map.
    pub fn read_all(&self) -> HashMap<String, String> {
        self.data.clone()
    }

    /// Copies of the data map, per-key clocks, and local clock.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            data: self.data.clone(),
            data_ts: self.key_clocks.clone(),
            cur_ts: self.local_clock.clone(),
        }
    }

    /// Copy of the operation log, taken by gossip before transmission.
    pub fn snapshot_log(&self) -> Vec<Operation> {
        self.log.clone()
    }

    /// Replace the peer blacklist.
    pub fn set_blacklist(&mut self, blacklist: HashSet<NodeId>) {
        self.blacklist = blacklist;
    }

    pub fn is_blacklisted(&self, node: NodeId) -> bool {
        self.blacklist.contains(&node)
    }

    pub fn blacklist(&self) -> &HashSet<NodeId> {
        &self.blacklist
    }
}
