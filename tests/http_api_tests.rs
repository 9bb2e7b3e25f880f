/// Integration tests for the HTTP wire contract.
///
/// Each test runs one real node on its own port and drives it with
/// plain HTTP requests, asserting the exact status codes and bodies of
/// the protocol.
use rumorkv::{ClusterConfig, Node, NodeEntry};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn single_node_config(port: u16) -> Arc<ClusterConfig> {
    Arc::new(ClusterConfig::new(vec![NodeEntry::new(
        0,
        "127.0.0.1",
        port,
        Duration::from_millis(200),
    )]))
}

async fn start_node(port: u16) -> Node {
    let node = Node::new(single_node_config(port), 0).unwrap();
    node.start().await.unwrap();
    // Give the listener a moment to start accepting.
    sleep(Duration::from_millis(50)).await;
    node
}

fn url(port: u16, path: &str) -> String {
    format!("http://127.0.0.1:{port}{path}")
}

async fn patch_update(client: &reqwest::Client, port: u16, body: &str) -> reqwest::Response {
    client
        .patch(url(port, "/update"))
        .header("Content-Type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap()
}

async fn get_json(client: &reqwest::Client, port: u16, path: &str) -> Value {
    client
        .get(url(port, path))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn update_then_read_and_snapshot() {
    let node = start_node(15621).await;
    let client = reqwest::Client::new();

    let response = patch_update(&client, 15621, r#"{"k":"v"}"#).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"status": "success"})
    );

    assert_eq!(get_json(&client, 15621, "/records").await, json!({"k": "v"}));

    let snapshot = get_json(&client, 15621, "/snapshot").await;
    assert_eq!(snapshot["data"], json!({"k": "v"}));
    assert_eq!(snapshot["data_ts"], json!({"k": {"0": 1}}));
    assert_eq!(snapshot["cur_ts"], json!({"0": 1}));

    node.stop();
}

#[tokio::test]
async fn update_rejects_malformed_bodies() {
    let node = start_node(15622).await;
    let client = reqwest::Client::new();

    for body in ["[1,2]", r#"{"k":5}"#, r#"{"k":null}"#, "not json"] {
        let response = patch_update(&client, 15622, body).await;
        assert_eq!(response.status(), 400, "body: {body}");
        assert_eq!(
            response.json::<Value>().await.unwrap(),
            json!({"error": "invalid body format"})
        );
    }

    // Nothing was written.
    assert_eq!(get_json(&client, 15622, "/records").await, json!({}));

    node.stop();
}

#[tokio::test]
async fn empty_value_deletes_a_key() {
    let node = start_node(15623).await;
    let client = reqwest::Client::new();

    patch_update(&client, 15623, r#"{"k":"v","k2":"v2"}"#).await;
    patch_update(&client, 15623, r#"{"k2":""}"#).await;

    assert_eq!(get_json(&client, 15623, "/records").await, json!({"k": "v"}));

    // The deleted key keeps its clock entry in the snapshot.
    let snapshot = get_json(&client, 15623, "/snapshot").await;
    assert_eq!(snapshot["data_ts"]["k2"], json!({"0": 3}));
    assert_eq!(snapshot["cur_ts"], json!({"0": 3}));

    node.stop();
}

#[tokio::test]
async fn merge_applies_peer_operations() {
    let node = start_node(15624).await;
    let client = reqwest::Client::new();

    let payload = r#"[{"f_key":"k","f_val":"v","f_op":"set","f_src":1,"f_ts":{"1":1}}]"#;
    let response = client
        .put(url(15624, "/merge"))
        .header("Node", "1")
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    assert_eq!(get_json(&client, 15624, "/records").await, json!({"k": "v"}));

    // The stamp was absorbed into the node's own clock.
    let snapshot = get_json(&client, 15624, "/snapshot").await;
    assert_eq!(snapshot["cur_ts"], json!({"1": 1}));

    node.stop();
}

#[tokio::test]
async fn merge_rejects_malformed_payload_with_catch_all() {
    let node = start_node(15625).await;
    let client = reqwest::Client::new();

    let response = client
        .put(url(15625, "/merge"))
        .header("Node", "1")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"error": "caught exception"})
    );

    node.stop();
}

#[tokio::test]
async fn exclude_drops_blacklisted_senders() {
    let node = start_node(15626).await;
    let client = reqwest::Client::new();

    let response = client
        .put(url(15626, "/exclude"))
        .header("Nodes", "1,2")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"status": "blacklist was updated"})
    );

    // Gossip from a blacklisted sender is ignored with an empty 204.
    let payload = r#"[{"f_key":"k","f_val":"v","f_op":"set","f_src":1,"f_ts":{"1":1}}]"#;
    let response = client
        .put(url(15626, "/merge"))
        .header("Node", "1")
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);
    assert_eq!(get_json(&client, 15626, "/records").await, json!({}));

    // Clearing the blacklist lets the same payload through.
    client
        .put(url(15626, "/exclude"))
        .header("Nodes", "")
        .send()
        .await
        .unwrap();
    let response = client
        .put(url(15626, "/merge"))
        .header("Node", "1")
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(get_json(&client, 15626, "/records").await, json!({"k": "v"}));

    node.stop();
}
