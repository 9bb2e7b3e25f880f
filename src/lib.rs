//! # rumorkv: a gossip-replicated key-value store
//!
//! A small cluster of symmetric peer nodes, each accepting writes for
//! any key. Nodes stamp local mutations with a vector clock, record
//! them in an append-only log, and ship the whole log to every peer on
//! a fixed timer. Conflicting writes are resolved deterministically:
//! causally newer stamps win, and concurrent stamps fall back to a
//! lexicographic comparison of the proposed values, so all nodes
//! converge without coordination.
//!
//! ## Running a cluster
//!
//! The cluster table is compiled in (three nodes on
//! `127.0.0.1:15501-15503` by default); each process takes its id:
//!
//! ```text
//! rumord 0 & rumord 1 & rumord 2 &
//! curl -X PATCH localhost:15501/update -d '{"k":"v"}'
//! curl localhost:15503/records
//! ```
//!
//! ## HTTP surface
//!
//! - `PATCH /update`: write keys (empty value deletes)
//! - `PUT /merge`: peer gossip (operation log)
//! - `PUT /exclude`: install a peer blacklist (simulated partitions)
//! - `GET /records`: current data
//! - `GET /snapshot`: data plus replication metadata
//!
//! ## Consistency model
//!
//! Eventually consistent. Writes at one node are totally ordered by its
//! clock; across nodes the merger guarantees convergence, not
//! linearizability. Deletes keep their per-key clock entry so they
//! dominate the sets they supersede. The log is never truncated, which
//! makes gossip delivery self-healing at the cost of unbounded growth.

pub mod clock;
pub mod config;
pub mod error;
pub mod gossip;
pub mod http;
mod merge;
pub mod node;
pub mod op;
pub mod store;

pub use clock::{NodeId, VectorClock};
pub use config::{ClusterConfig, NodeEntry};
pub use error::{KvError, KvResult};
pub use node::Node;
pub use op::{OpKind, Operation};
pub use store::{SharedStore, Snapshot, Store};

/// Initialize the logging system.
///
/// Call once at process startup. The level is controlled through the
/// `RUMORKV_LOG` environment variable (`error`, `warn`, `info`,
/// `debug`, `trace`); the default is `info`. Output goes to standard
/// error.
pub fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("RUMORKV_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
