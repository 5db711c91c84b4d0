use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use ballotchain::election::ElectionManager;
use ballotchain::rpc::{router, AppState, AuthConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(auth: AuthConfig) -> Router {
    router(AppState::new(Arc::new(ElectionManager::new(1, 4))), auth)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    call_with(app, method, uri, body, None).await
}

async fn call_with(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<String>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("x-auth-token", t);
    }
    let req = match body {
        Some(v) => req.header("content-type", "application/json").body(Body::from(v.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn voting_round_over_http() {
    let app = app(AuthConfig::disabled());

    let (s, v) = call(&app, "POST", "/api/create-election", Some(json!({"election_name": "Council", "difficulty": 2}))).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(v["success"], true);

    let (_, v) = call(
        &app,
        "POST",
        "/api/register-candidate",
        Some(json!({"candidate_id": "C1", "name": "Carol", "party": "Blue", "description": "d"})),
    )
    .await;
    assert_eq!(v["success"], true);

    let (_, v) = call(&app, "POST", "/api/register-voter", Some(json!({"voter_id": "V1", "name": "Alice", "email": "a@x"}))).await;
    let key = v["private_key"].as_str().unwrap().to_string();
    assert_eq!(key.len(), 64);

    let (s, _) = call(&app, "POST", "/api/start-election", None).await;
    assert_eq!(s, StatusCode::OK);

    let (s, v) = call(&app, "POST", "/api/cast-vote", Some(json!({"voter_id": "V1", "candidate_id": "C1", "private_key": key}))).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(v["pending_count"], 1);
    let receipt = v["transaction_hash"].as_str().unwrap().to_string();

    let (s, v) = call(&app, "POST", "/api/mine-votes", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(v["block_index"], 1);
    assert_eq!(v["transaction_count"], 1);
    assert!(v["block_hash"].as_str().unwrap().starts_with("00"));

    let (_, v) = call(&app, "GET", "/api/verify-blockchain", None).await;
    assert_eq!(v["is_valid"], true);

    let (_, v) = call(&app, "GET", "/api/blockchain-data", None).await;
    assert_eq!(v["blocks"].as_array().unwrap().len(), 2);
    assert_eq!(v["blocks"][1]["transaction_count"], 1);

    let (_, v) = call(&app, "GET", "/api/stats", None).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["stats"]["voter_count"], 1);
    assert_eq!(v["stats"]["candidate_count"], 1);
    assert_eq!(v["stats"]["votes_cast"], 1);
    assert_eq!(v["stats"]["pending_votes"], 0);
    assert_eq!(v["stats"]["blockchain_blocks"], 2);
    assert_eq!(v["stats"]["blockchain_valid"], true);
    assert!(v.get("votes_cast").is_none());

    let (_, v) = call(&app, "POST", "/api/verify-receipt", Some(json!({"transaction_hash": receipt}))).await;
    assert_eq!(v["status"], "confirmed");
    assert_eq!(v["block_index"], 1);

    let (s, v) = call(&app, "POST", "/api/check-status", Some(json!({"voter_id": "V1"}))).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(v["voter"]["has_voted"], true);

    let (s, v) = call(&app, "POST", "/api/cast-vote", Some(json!({"voter_id": "V1", "candidate_id": "C1", "private_key": key}))).await;
    assert_eq!(s, StatusCode::CONFLICT);
    assert_eq!(v["success"], false);
    assert!(v.get("transaction_hash").is_none());
}

#[tokio::test]
async fn errors_map_to_statuses() {
    let app = app(AuthConfig::disabled());

    let (s, v) = call(&app, "GET", "/api/stats", None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(v["success"], false);

    let (s, _) = call(&app, "POST", "/api/create-election", Some(json!({"election_name": "X", "difficulty": 9}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);

    call(&app, "POST", "/api/create-sample-data", None).await;
    let (s, _) = call(&app, "POST", "/api/mine-votes", None).await;
    assert_eq!(s, StatusCode::CONFLICT);

    let (s, _) = call(&app, "POST", "/api/check-status", Some(json!({"voter_id": "nobody"}))).await;
    assert_eq!(s, StatusCode::NOT_FOUND);

    let (s, _) = call(&app, "POST", "/api/verify-receipt", Some(json!({"transaction_hash": "xyz"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sample_data_and_election_switching() {
    let app = app(AuthConfig::disabled());

    let (_, first) = call(&app, "POST", "/api/create-sample-data", None).await;
    assert_eq!(first["voter_credentials"].as_array().unwrap().len(), 20);
    let first_id = first["election_id"].as_str().unwrap().to_string();

    let (_, second) = call(&app, "POST", "/api/create-sample-data", None).await;
    let second_id = second["election_id"].as_str().unwrap().to_string();

    let (_, v) = call(&app, "GET", "/api/list-elections", None).await;
    assert_eq!(v["elections"].as_array().unwrap().len(), 2);
    assert_eq!(v["current_election_id"], second_id.as_str());

    let (_, v) = call(&app, "GET", "/api/candidates", None).await;
    assert_eq!(v["candidates"].as_array().unwrap().len(), 3);

    let (_, v) = call(&app, "GET", &format!("/api/candidates?election_id={first_id}"), None).await;
    assert_eq!(v["candidates"].as_array().unwrap().len(), 5);

    let (s, _) = call(&app, "POST", "/api/switch-election", Some(json!({"election_id": first_id}))).await;
    assert_eq!(s, StatusCode::OK);
    let (_, v) = call(&app, "GET", "/api/results", None).await;
    assert_eq!(v["election_name"], "University Student Council Election 2025");
    assert_eq!(v["total_voters"], 20);
}

#[tokio::test]
async fn admin_routes_require_token() {
    let auth = AuthConfig::from_secret(Some("hunter2"));
    let app = app(auth.clone());

    let (s, _) = call(&app, "POST", "/api/create-sample-data", None).await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);

    let (s, _) = call_with(&app, "POST", "/api/create-sample-data", None, Some("00".repeat(32))).await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);

    // the MAC covers the full route, not the part left after the `/api` nest
    let nested_only = auth.token_for("/create-sample-data");
    let (s, _) = call_with(&app, "POST", "/api/create-sample-data", None, nested_only).await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);

    let token = auth.token_for("/api/create-sample-data");
    let (s, v) = call_with(&app, "POST", "/api/create-sample-data", None, token).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(v["success"], true);

    let (s, _) = call_with(&app, "POST", "/api/start-election", None, auth.token_for("/api/start-election")).await;
    assert_eq!(s, StatusCode::OK);

    // voter routes stay open
    let (s, _) = call(&app, "GET", "/api/candidates", None).await;
    assert_eq!(s, StatusCode::OK);
}

#[tokio::test]
async fn health_and_metrics() {
    let app = app(AuthConfig::disabled());
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    call(&app, "POST", "/api/create-election", Some(json!({"election_name": "M"}))).await;
    let resp = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
    assert!(text.contains("ballotchain_elections_created"));
}
