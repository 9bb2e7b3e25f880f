/// HTTP transport for rumorkv.
///
/// The transport is a thin collaborator over the store; all decisions
/// about state live in the merger and the clock.
///
/// # Endpoints
///
/// - `PATCH /update`: client write; JSON object of string values, an
///   empty value deletes the key
/// - `PUT /merge`: peer gossip; JSON array of wire operations, sender
///   identified by the `Node` header
/// - `PUT /exclude`: replace the blacklist from the `Nodes` header
///   (comma-separated decimal ids)
/// - `GET /records`: visible data map
/// - `GET /snapshot`: data, per-key clocks, and the node's clock
///
/// Blacklisted senders are dropped silently with an empty 204. Internal
/// failures never leak details: the peer sees the catch-all error body
/// while the cause goes to the log.
use crate::clock::NodeId;
use crate::error::KvError;
use crate::op::Operation;
use crate::store::{SharedStore, Store};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, put};
use axum::{Json, Router};
use serde_json::{json, Value as JsonValue};
use std::sync::MutexGuard;

/// Build the router over the shared store.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/update", patch(handle_update))
        .route("/merge", put(handle_merge))
        .route("/exclude", put(handle_exclude))
        .route("/records", get(handle_records))
        .route("/snapshot", get(handle_snapshot))
        .with_state(store)
}

impl IntoResponse for KvError {
    fn into_response(self) -> Response {
        tracing::error!("handler failure: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "caught exception"})),
        )
            .into_response()
    }
}

fn lock(store: &SharedStore) -> Result<MutexGuard<'_, Store>, KvError> {
    store
        .lock()
        .map_err(|_| KvError::Internal("store mutex poisoned".into()))
}

/// Sender id from the `Node` header, when present and well-formed.
fn sender_id(headers: &HeaderMap) -> Option<NodeId> {
    headers.get("Node")?.to_str().ok()?.trim().parse().ok()
}

/// Parse an `/update` body: a JSON object mapping keys to string
/// values, kept in document order. Anything else is malformed input.
fn parse_update_body(body: &str) -> Option<Vec<(String, String)>> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    let JsonValue::Object(map) = value else {
        return None;
    };
    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let JsonValue::String(value) = value else {
            return None;
        };
        pairs.push((key, value));
    }
    Some(pairs)
}

async fn handle_update(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, KvError> {
    if let Some(sender) = sender_id(&headers) {
        if lock(&store)?.is_blacklisted(sender) {
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    }

    let Some(pairs) = parse_update_body(&body) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid body format"})),
        )
            .into_response());
    };

    let mut store = lock(&store)?;
    for (key, value) in pairs {
        store.write(key, value);
    }
    Ok((StatusCode::OK, Json(json!({"status": "success"}))).into_response())
}

async fn handle_merge(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, KvError> {
    if let Some(sender) = sender_id(&headers) {
        if lock(&store)?.is_blacklisted(sender) {
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    }

    // A malformed peer payload is a handler-internal failure (500), not
    // a client error.
    let ops: Vec<Operation> = serde_json::from_str(&body)?;

    let mut store = lock(&store)?;
    for op in ops {
        let stamp = op.stamp.clone();
        store.apply(op);
        store.absorb(&stamp);
    }
    Ok((StatusCode::OK, Json(json!({"status": "success"}))).into_response())
}

async fn handle_exclude(
    State(store): State<SharedStore>,
    headers: HeaderMap,
) -> Result<Response, KvError> {
    let header = headers
        .get("Nodes")
        .ok_or_else(|| KvError::Internal("missing Nodes header".into()))?
        .to_str()
        .map_err(|_| KvError::Internal("unreadable Nodes header".into()))?;

    let blacklist = header
        .split(',')
        .filter_map(|token| token.trim().parse::<NodeId>().ok())
        .collect();
    lock(&store)?.set_blacklist(blacklist);
    Ok((
        StatusCode::OK,
        Json(json!({"status": "blacklist was updated"})),
    )
        .into_response())
}

async fn handle_records(State(store): State<SharedStore>) -> Result<Response, KvError> {
    let data = lock(&store)?.read_all();
    Ok(Json(data).into_response())
}

async fn handle_snapshot(State(store): State<SharedStore>) -> Result<Response, KvError> {
    let snapshot = lock(&store)?.snapshot();
    Ok(Json(snapshot).into_response())
}
