/// Cluster configuration.
///
/// The cluster table is compiled in and identical on every node: an
/// ordered list of members with the address each one binds and the
/// period of its gossip timer. Membership never changes at runtime.
use crate::clock::NodeId;
use std::time::Duration;

/// One row of the cluster table.
#[derive(Debug, Clone)]
pub struct NodeEntry {
    pub id: NodeId,
    pub host: String,
    pub port: u16,
    /// Period between gossip rounds for this node.
    pub gossip_interval: Duration,
}

impl NodeEntry {
    pub fn new(
        id: NodeId,
        host: impl Into<String>,
        port: u16,
        gossip_interval: Duration,
    ) -> Self {
        Self {
            id,
            host: host.into(),
            port,
            gossip_interval,
        }
    }

    /// `host:port`, the bind address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL peers use to reach this node.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Ordered table of cluster members.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    nodes: Vec<NodeEntry>,
}

impl Default for ClusterConfig {
    /// Three nodes on localhost, gossiping every 0.8 seconds.
    fn default() -> Self {
        let interval = Duration::from_millis(800);
        Self::new(vec![
            NodeEntry::new(0, "127.0.0.1", 15501, interval),
            NodeEntry::new(1, "127.0.0.1", 15502, interval),
            NodeEntry::new(2, "127.0.0.1", 15503, interval),
        ])
    }
}

impl ClusterConfig {
    pub fn new(nodes: Vec<NodeEntry>) -> Self {
        Self { nodes }
    }

    /// Look up a member by id.
    pub fn node(&self, id: NodeId) -> Option<&NodeEntry> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Every member other than `id`.
    pub fn peers_of(&self, id: NodeId) -> impl Iterator<Item = &NodeEntry> {
        self.nodes.iter().filter(move |n| n.id != id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeEntry> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
