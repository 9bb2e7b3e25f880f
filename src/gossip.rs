/// Timer-driven replication.
///
/// Every gossip interval the node serializes its entire operation log
/// and sends it to every peer whose id is not blacklisted. Delivery is
/// best-effort: the log is never truncated, so a missed round is made
/// whole by the next one.
use crate::clock::NodeId;
use crate::config::ClusterConfig;
use crate::store::SharedStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::interval;

/// Outbound request timeout. A peer that does not answer in time is
/// simply retried on the next round.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Spawn the gossip loop for `node_id`.
///
/// The task wakes every `period`, ships the log, and exits at its next
/// wake after `shutdown` fires.
pub fn spawn(
    store: SharedStore,
    config: Arc<ClusterConfig>,
    node_id: NodeId,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let client = match reqwest::Client::builder().timeout(DISPATCH_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("gossip client construction failed: {e}");
                return;
            }
        };

        let mut ticker = interval(period);
        loop {
            tokio::select! {
                _ = ticker.tick() => send_round(&store, &client, &config, node_id),
                _ = shutdown.recv() => break,
            }
        }
    })
}

/// One gossip round: serialize the log under the lock, release, then
/// dispatch to each peer on its own task.
fn send_round(
    store: &SharedStore,
    client: &reqwest::Client,
    config: &ClusterConfig,
    node_id: NodeId,
) {
    let (payload, blacklist) = {
        let store = match store.lock() {
            Ok(guard) => guard,
            Err(e) => {
                tracing::error!("store mutex poisoned: {e}");
                return;
            }
        };
        let payload = match serde_json::to_vec(&store.snapshot_log()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("log serialization failed: {e}");
                return;
            }
        };
        (payload, store.blacklist().clone())
    };

    for peer in config.peers_of(node_id) {
        if blacklist.contains(&peer.id) {
            continue;
        }
        let request = client
            .put(format!("{}/merge", peer.base_url()))
            .header("Node", node_id.to_string())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.clone());
        let peer_id = peer.id;
        tokio::spawn(async move {
            match request.send().await {
                Ok(response) => {
                    if !response.status().is_success() {
                        tracing::debug!(peer = peer_id, status = %response.status(), "gossip rejected");
                    }
                }
                Err(e) => tracing::debug!(peer = peer_id, "gossip dispatch failed: {e}"),
            }
        });
    }
}
