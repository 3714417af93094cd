//! REST gateway tests against a local mock of the ledger's REST API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine as _;
use serde_json::{json, Value};

use cookiejar_client::{
    BatchStatus, ClientConfig, ClientError, CookieJarClient, Gateway, RestGateway,
};
use cookiejar_core::canonical::decode_batch_list;
use cookiejar_core::{address_for, CookieCount, Keypair, Signer};

#[derive(Default)]
struct Mock {
    submitted: Vec<String>,
    polls: u32,
    waits: Vec<String>,
    jars: HashMap<String, String>,
}

type Shared = Arc<Mutex<Mock>>;

fn error_body(code: u32, title: &str, message: &str) -> Json<Value> {
    Json(json!({ "error": { "code": code, "title": title, "message": message } }))
}

async fn get_state(
    State(mock): State<Shared>,
    Path(address): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mock = mock.lock().unwrap();
    match mock.jars.get(&address) {
        Some(value) if value == "garbage" => (StatusCode::OK, Json(json!({ "head": "h1" }))),
        Some(value) => {
            let data = base64::engine::general_purpose::STANDARD.encode(value);
            (StatusCode::OK, Json(json!({ "data": data, "head": "h1" })))
        }
        None => (
            StatusCode::NOT_FOUND,
            error_body(75, "State Not Found", "no state at address"),
        ),
    }
}

async fn post_batches(State(mock): State<Shared>, body: Bytes) -> (StatusCode, Json<Value>) {
    match decode_batch_list(&body) {
        Ok(list) => {
            let ids: Vec<String> = list.batches.iter().map(|b| b.id().to_string()).collect();
            let link = format!("http://mock/batch_statuses?id={}", ids.join(","));
            mock.lock().unwrap().submitted.extend(ids);
            (StatusCode::ACCEPTED, Json(json!({ "link": link })))
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            error_body(35, "Protobuf Not Decodable", &e.to_string()),
        ),
    }
}

async fn get_batch_statuses(
    State(mock): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let id = params.get("id").cloned().unwrap_or_default();
    let mut mock = mock.lock().unwrap();
    mock.waits.push(params.get("wait").cloned().unwrap_or_default());

    match id.as_str() {
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(10, "Unknown Validator Error", "validator exploded"),
        ),
        "garbled" => (StatusCode::OK, Json(json!({ "data": "nope" }))),
        _ => {
            mock.polls += 1;
            let status = if mock.polls <= 2 { "PENDING" } else { "COMMITTED" };
            (
                StatusCode::OK,
                Json(json!({ "data": [{ "id": id, "status": status, "invalid_transactions": [] }] })),
            )
        }
    }
}

async fn spawn_mock() -> (String, Shared) {
    let mock = Shared::default();
    let app = Router::new()
        .route("/state/{address}", get(get_state))
        .route("/batches", post(post_batches))
        .route("/batch_statuses", get(get_batch_statuses))
        .with_state(Arc::clone(&mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), mock)
}

fn config(url: &str) -> ClientConfig {
    ClientConfig::default()
        .with_url(url)
        .with_poll_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn test_perform_polls_until_committed() {
    let (url, mock) = spawn_mock().await;
    let client = CookieJarClient::connect(Keypair::generate(), config(&url)).unwrap();

    let entry = client.bake(5).await.unwrap();
    assert_eq!(entry.status, BatchStatus::Committed);

    let mock = mock.lock().unwrap();
    assert_eq!(mock.submitted, vec![entry.id.clone()]);
    assert_eq!(mock.polls, 3);
    for wait in &mock.waits {
        let secs: u64 = wait.parse().unwrap();
        assert!(secs <= 10);
    }
}

#[tokio::test]
async fn test_read_state() {
    let (url, mock) = spawn_mock().await;
    let keypair = Keypair::generate();
    let identity = keypair.public_key().to_hex();
    mock.lock()
        .unwrap()
        .jars
        .insert(address_for(&identity).to_string(), "8".into());

    let client = CookieJarClient::connect(keypair, config(&url)).unwrap();
    assert_eq!(client.count().await.unwrap(), CookieCount(8));
}

#[tokio::test]
async fn test_missing_state_is_not_found() {
    let (url, _mock) = spawn_mock().await;
    let client = CookieJarClient::connect(Keypair::generate(), config(&url)).unwrap();
    assert!(matches!(
        client.read_state("nobody").await,
        Err(ClientError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_state_shape_mismatch_is_decode_error() {
    let (url, mock) = spawn_mock().await;
    mock.lock()
        .unwrap()
        .jars
        .insert(address_for("weird").to_string(), "garbage".into());

    let client = CookieJarClient::connect(Keypair::generate(), config(&url)).unwrap();
    assert!(matches!(
        client.read_state("weird").await,
        Err(ClientError::Decode(_))
    ));
}

#[tokio::test]
async fn test_gateway_error_status() {
    let (url, _mock) = spawn_mock().await;
    let gateway = RestGateway::new(&config(&url)).unwrap();

    match gateway.batch_status("broken", Duration::from_secs(1)).await {
        Err(ClientError::Gateway { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "validator exploded");
        }
        other => panic!("expected gateway error, got {other:?}"),
    }

    assert!(matches!(
        gateway.batch_status("garbled", Duration::from_secs(1)).await,
        Err(ClientError::Decode(_))
    ));
}

#[tokio::test]
async fn test_rejected_body_is_gateway_error() {
    let (url, _mock) = spawn_mock().await;
    let gateway = RestGateway::new(&config(&url)).unwrap();
    assert!(matches!(
        gateway.submit_batches(vec![0x0a, 0xff]).await,
        Err(ClientError::Gateway { status: 400, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_gateway_is_network_error() {
    let gateway = RestGateway::new(&config("127.0.0.1:1")).unwrap();
    assert!(matches!(
        gateway.state(&address_for("anyone")).await,
        Err(ClientError::Network(_))
    ));
}
