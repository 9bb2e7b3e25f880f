/// The replicated operation record.
///
/// Operations are the unit of replication: every local mutation is
/// recorded as one, appended to the log, and shipped to peers on every
/// gossip round. The wire field names (`f_key`, `f_val`, `f_op`,
/// `f_src`, `f_ts`) are fixed by the protocol and must not change.
use crate::clock::{NodeId, VectorClock};
use serde::{Deserialize, Serialize};

/// Kind of mutation an operation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Set,
    Del,
}

/// One recorded mutation, stamped with the origin's clock at creation.
///
/// The stamp is immutable once the operation is appended to a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "f_key")]
    pub key: String,
    #[serde(rename = "f_val")]
    pub value: String,
    #[serde(rename = "f_op")]
    pub kind: OpKind,
    #[serde(rename = "f_src")]
    pub origin: NodeId,
    #[serde(rename = "f_ts")]
    pub stamp: VectorClock,
}

impl Operation {
    /// Build an operation from a client write.
    ///
    /// An empty value means delete; anything else is a set. The caller
    /// passes a copy of its local clock as the stamp.
    pub fn from_client(
        key: impl Into<String>,
        value: impl Into<String>,
        origin: NodeId,
        stamp: VectorClock,
    ) -> Self {
        let value = value.into();
        let kind = if value.is_empty() {
            OpKind::Del
        } else {
            OpKind::Set
        };
        Self {
            key: key.into(),
            value,
            kind,
            origin,
            stamp,
        }
    }
}
