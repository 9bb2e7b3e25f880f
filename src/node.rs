/// A single cluster member.
///
/// `Node` wires the pieces together: the shared store, the HTTP
/// transport, and the gossip loop, all torn down through one broadcast
/// shutdown channel. The binary runs exactly one; integration tests run
/// several in-process to form a cluster.
use crate::clock::NodeId;
use crate::config::{ClusterConfig, NodeEntry};
use crate::error::{KvError, KvResult};
use crate::gossip;
use crate::http;
use crate::store::{SharedStore, Store};
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct Node {
    entry: NodeEntry,
    config: Arc<ClusterConfig>,
    store: SharedStore,
    shutdown_tx: broadcast::Sender<()>,
}

impl Node {
    /// Create the node for `id` in the cluster table.
    pub fn new(config: Arc<ClusterConfig>, id: NodeId) -> KvResult<Self> {
        let entry = config.node(id).cloned().ok_or(KvError::UnknownNode(id))?;
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            entry,
            config,
            store: Store::shared(id),
            shutdown_tx,
        })
    }

    pub fn id(&self) -> NodeId {
        self.entry.id
    }

    /// Handle on this node's store.
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    /// Base URL clients use to reach this node.
    pub fn base_url(&self) -> String {
        self.entry.base_url()
    }

    /// Bind the transport and spawn the server and gossip tasks.
    ///
    /// Returns once the listener is bound; the bind failure is the only
    /// fatal startup error.
    pub async fn start(&self) -> KvResult<()> {
        let addr = self.entry.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| KvError::Bind { addr, source })?;
        tracing::info!(node = self.entry.id, addr = %self.entry.addr(), "listening");

        let app = http::router(self.store());
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.recv().await;
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                tracing::error!("server error: {e}");
            }
        });

        gossip::spawn(
            self.store(),
            Arc::clone(&self.config),
            self.entry.id,
            self.entry.gossip_interval,
            self.shutdown_tx.subscribe(),
        );
        Ok(())
    }

    /// Signal the server and the gossip loop to exit. The gossip loop
    /// stops at its next wake; in-flight requests are allowed to finish.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
