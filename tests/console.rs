//! End-to-end tests against a mock fund-platform backend.
//!
//! The backend here speaks the real wire contract: `{status, data,
//! message}` envelopes, both pagination shapes, and the loose mutual-fund
//! field encodings.

use axum::extract::Query;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use fundesk::client::ApiClient;
use fundesk::resources::{AmcContext, MutualFundContext};
use fundesk::session;

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/amc/list", get(amc_list))
        .route("/mutual-fund/list", get(fund_list));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5))
        .unwrap()
        .with_token("test-token")
}

async fn login() -> Json<Value> {
    Json(json!({
        "status": true,
        "data": {
            "token": "test-token",
            "user": {
                "_id": "u1",
                "name": "Asha Iyer",
                "email": "asha@example.com",
                "role": "ops",
                "permissions": ["amc:read", "mutual-fund:*"]
            }
        }
    }))
}

async fn amc_list(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("search").map(String::as_str) == Some("boom") {
        return Json(json!({"status": false, "message": "backend exploded"}));
    }

    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    Json(json!({
        "status": true,
        "data": {
            "amcList": [
                {"_id": "a1", "name": "Axis AMC", "code": "AXIS"},
                {"_id": "a2", "name": "HDFC AMC", "code": "HDFC", "status": "suspended"}
            ],
            "pagination": {"page": page, "limit": 10, "total": 2}
        }
    }))
}

async fn fund_list() -> Json<Value> {
    Json(json!({
        "status": true,
        "data": {
            "fundList": [
                {
                    "_id": "f1",
                    "name": "Bluechip Growth",
                    "category": {"name": "Equity"},
                    "fundManagers": [{"name": "A. Rao"}, "S. Mehta"],
                    "holdings": {"holdings": [{"symbol": "TCS", "allocation": 9.1}]},
                    "nav": 84.12
                },
                {
                    "_id": "f2",
                    "name": "Liquid Plus"
                }
            ],
            "pagination": {"currentPage": 1, "totalPages": 1, "totalRecords": 2}
        }
    }))
}

#[tokio::test]
async fn login_yields_session_with_permissions() {
    let base_url = spawn_backend().await;
    let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let session = session::login(&client, "asha@example.com", "pw").await.unwrap();
    assert_eq!(session.token, "test-token");
    assert!(session.can(&"amc:read".parse().unwrap()));
    assert!(session.can(&"mutual-fund:list".parse().unwrap()));
    // `amc:read` alone must not unlock writes
    assert!(!session.can(&"amc:create".parse().unwrap()));
    assert!(!session.is_expired());
}

#[tokio::test]
async fn successful_fetch_replaces_items_and_pagination() {
    let base_url = spawn_backend().await;
    let client = client_for(&base_url);
    let mut context = AmcContext::new(&client);

    context.fetch(1, 10, None).await;

    let store = context.store();
    assert!(store.error().is_none());
    assert!(!store.loading());
    assert_eq!(store.items().len(), 2);
    assert_eq!(store.items()[0].name, "Axis AMC");
    assert_eq!(store.items()[0].status, "active");
    assert_eq!(store.items()[1].status, "suspended");
    assert_eq!(store.pagination().total, 2);
    assert_eq!(store.pagination().showing(), (1, 2));
}

#[tokio::test]
async fn failed_fetch_keeps_previous_items_and_sets_error() {
    let base_url = spawn_backend().await;
    let client = client_for(&base_url);
    let mut context = AmcContext::new(&client);

    context.fetch(1, 10, None).await;
    assert_eq!(context.store().items().len(), 2);

    context.fetch(1, 10, Some("boom".to_string())).await;
    assert_eq!(context.store().error(), Some("backend exploded"));
    // previous page is still on screen
    assert_eq!(context.store().items().len(), 2);
    assert!(!context.store().loading());
}

#[tokio::test]
async fn fund_payload_shapes_normalize() {
    let base_url = spawn_backend().await;
    let client = client_for(&base_url);
    let mut context = MutualFundContext::new(&client);

    context.fetch(1, 10, None).await;

    let store = context.store();
    assert!(store.error().is_none());
    let funds = store.items();
    assert_eq!(funds.len(), 2);

    assert_eq!(funds[0].category, "Equity");
    assert_eq!(funds[0].fund_managers, vec!["A. Rao", "S. Mehta"]);
    assert_eq!(funds[0].holdings.len(), 1);
    assert_eq!(funds[0].holdings[0].name, "TCS");

    // bare record: every loose field collapses to its placeholder
    assert_eq!(funds[1].category, "Uncategorized");
    assert!(funds[1].fund_managers.is_empty());
    assert!(funds[1].holdings.is_empty());
    assert_eq!(funds[1].nav, 0.0);

    // counted pagination shape, normalized with the requested limit
    assert_eq!(store.pagination().limit, 10);
    assert_eq!(store.pagination().total, 2);
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    // Port 9 is discard; if a request were issued this would hang or
    // error differently. MissingToken must come back immediately.
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(5)).unwrap();
    let mut context = AmcContext::new(&client);

    context.fetch(1, 10, None).await;
    let error = context.store().error().unwrap();
    assert!(error.contains("not logged in"), "got: {}", error);
}
