//! End-to-end tests over a real socket

use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use twinmock_api::{create_app, AppState};
use twinmock_core::DeviceRegistry;

async fn spawn_server(registry: DeviceRegistry) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_app(AppState::new(registry, "server.cert"));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn test_harness_scenario() {
    let addr = spawn_server(DeviceRegistry::new()).await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();

    let response = client
        .put(format!("{base}/manage-api/devices/gateway-7"))
        .json(&json!({"properties": {"reported": {"fw": "1.0"}}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .put(format!(
            "{base}/manage-api/devices/gateway-7/direct-method-response/modules/edgeAgent/methods/ping"
        ))
        .json(&json!({"count": 1, "status": 200, "payload": {"pong": true}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{base}/twins/gateway-7/modules/edgeAgent/methods"))
        .json(&json!({"methodName": "ping", "payload": {"seq": 1}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": 200, "payload": {"pong": true}}));

    let response = client
        .post(format!("{base}/twins/gateway-7/modules/edgeAgent/methods"))
        .json(&json!({"methodName": "ping", "payload": {"seq": 2}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "no response known");

    let calls: Value = client
        .get(format!(
            "{base}/manage-api/devices/gateway-7/modules/edgeAgent/direct-method-calls"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        calls,
        json!({"ping": [{"methodName": "ping", "payload": {"seq": 1}}]})
    );
}

#[tokio::test]
async fn test_registry_is_shared_with_the_server() {
    let registry = DeviceRegistry::new();
    let addr = spawn_server(registry.clone()).await;

    let response = reqwest::Client::new()
        .put(format!("http://{addr}/manage-api/devices/sensor-1"))
        .json(&json!({"temp": 21}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    assert_eq!(registry.twin_value("sensor-1").unwrap(), json!({"temp": 21}));
}

#[tokio::test]
async fn test_unknown_request_over_socket() {
    let addr = spawn_server(DeviceRegistry::new()).await;

    let response = reqwest::get(format!("http://{addr}/some/legacy/endpoint?x=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({}));
}
