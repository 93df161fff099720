//! End-to-end integration test for the dashboard flow.
//!
//! Spins an in-process stub of the hosted platform (identity provider +
//! store REST API) and the full application router on random ports, then
//! drives sign-in, fetch, filtering, and failure handling over HTTP.
//!
//! Run with: `cargo test --test dashboard_flow_test`

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde_json::{json, Value};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASS: &str = "Demo123!Test";
const DEMO_USER_ID: &str = "5f1e7a7a-2a4b-4b02-9c35-6f2f7d9b8a01";

/// Shared toggles and counters for the platform stub.
#[derive(Clone, Default)]
struct StubState {
    fail_views: Arc<AtomicBool>,
    store_hits: Arc<AtomicUsize>,
}

fn session_body() -> Value {
    json!({
        "access_token": "stub-access-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "stub-refresh-token",
        "user": { "id": DEMO_USER_ID, "email": DEMO_EMAIL }
    })
}

async fn stub_token(
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let password_grant = params.get("grant_type").map(String::as_str) == Some("password");
    let credentials_match =
        body["email"] == DEMO_EMAIL && body["password"] == DEMO_PASS;
    if password_grant && credentials_match {
        (StatusCode::OK, Json(session_body()))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "msg": "Invalid login credentials" })),
        )
    }
}

async fn stub_sales(State(stub): State<StubState>) -> Json<Value> {
    stub.store_hits.fetch_add(1, Ordering::SeqCst);
    let rows: Vec<Value> = (1..=20)
        .map(|d| json!({ "date": format!("2024-01-{d:02}"), "amount": (d as f64) * 100.0 }))
        .collect();
    Json(Value::Array(rows))
}

async fn stub_customers(State(stub): State<StubState>) -> Json<Value> {
    stub.store_hits.fetch_add(1, Ordering::SeqCst);
    // Purchase-date descending, like the real store serves them.
    let customers = [
        ("Olivia Martin", "2024-01-12", "Subscribed", 1999.0),
        ("Jackson Lee", "2024-01-09", "Subscribed", 39.0),
        ("Isabella Nguyen", "2024-01-08", "Unsubscribed", 299.0),
        ("William Kim", "2024-01-06", "Subscribed", 99.0),
        ("Sofia Davis", "2024-01-03", "Subscribed", 39.0),
        ("Lucas Anderson", "2024-01-01", "Subscribed", 79.0),
    ];
    let rows: Vec<Value> = customers
        .iter()
        .enumerate()
        .map(|(i, (name, day, status, revenue))| {
            json!({
                "id": format!("00000000-0000-4000-8000-{:012}", i + 1),
                "name": name,
                "email": format!("c{i}@example.com"),
                "subscription_status": status,
                "purchase_date": format!("{day}T09:00:00+00:00"),
                "total_revenue": revenue,
            })
        })
        .collect();
    Json(Value::Array(rows))
}

async fn stub_views(State(stub): State<StubState>) -> (StatusCode, Json<Value>) {
    stub.store_hits.fetch_add(1, Ordering::SeqCst);
    if stub.fail_views.load(Ordering::SeqCst) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "permission denied" })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!([{ "date": "2024-01-20", "count": 15230 }])),
        )
    }
}

async fn stub_active_users(State(stub): State<StubState>) -> Json<Value> {
    stub.store_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([{ "date": "2024-01-20", "count": 573 }]))
}

/// Start the platform stub, returning its base URL and handles.
async fn start_platform_stub() -> (String, StubState) {
    let stub = StubState::default();
    let app = Router::new()
        .route("/auth/v1/token", post(stub_token))
        .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }))
        .route("/auth/v1/health", get(|| async { "OK" }))
        .route("/rest/v1/sales_data", get(stub_sales))
        .route("/rest/v1/customers", get(stub_customers))
        .route("/rest/v1/views_data", get(stub_views))
        .route("/rest/v1/active_users", get(stub_active_users))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), stub)
}

/// Start the full application against the given platform URL.
async fn start_app(platform_url: &str) -> String {
    let config = pulseboard::config::AppConfig {
        platform_url: platform_url.to_string(),
        platform_anon_key: "stub-anon-key".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        frontend_url: "http://localhost:5173".to_string(),
    };
    let state = pulseboard::AppState::new(config);
    state.spawn_refresher();
    let app = pulseboard::routes::api_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn dashboard(client: &Client, base: &str) -> Value {
    let response = client
        .get(format!("{base}/api/v1/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json::<Value>().await.unwrap()["data"].clone()
}

/// Poll the dashboard until the refresher has produced the expected state.
async fn wait_for_dashboard<F>(client: &Client, base: &str, predicate: F) -> Value
where
    F: Fn(&Value) -> bool,
{
    for _ in 0..200 {
        let view = dashboard(client, base).await;
        if predicate(&view) {
            return view;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("dashboard never reached the expected state");
}

fn settled(view: &Value) -> bool {
    view["loading"] == false
}

#[tokio::test]
async fn full_dashboard_flow() {
    let (platform, _stub) = start_platform_stub().await;
    let base = start_app(&platform).await;
    let client = Client::new();

    // Before sign-in the first cycle ends without data and with the
    // unauthenticated diagnostic.
    let view = wait_for_dashboard(&client, &base, |v| {
        settled(v) && v["debug_info"].is_string()
    })
    .await;
    assert_eq!(view["has_any_data"], false);
    assert!(view["debug_info"]
        .as_str()
        .unwrap()
        .contains("No authenticated user"));
    assert!(view["empty_message"].is_string());

    // Wrong password is a provider rejection, not a fault.
    let response = client
        .post(format!("{base}/api/v1/auth/login"))
        .json(&json!({ "email": DEMO_EMAIL, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "AUTH_REJECTED");
    assert_eq!(body["error"]["message"], "Invalid login credentials");

    // Successful sign-in returns the session view without leaking tokens.
    let response = client
        .post(format!("{base}/api/v1/auth/login"))
        .json(&json!({ "email": DEMO_EMAIL, "password": DEMO_PASS }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = response.text().await.unwrap();
    assert!(!text.contains("stub-access-token"));
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["data"]["email"], DEMO_EMAIL);

    let session: Value = client
        .get(format!("{base}/api/v1/auth/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["data"]["user_id"], DEMO_USER_ID);

    // The session change triggers a fetch cycle; unfiltered view shows
    // everything, customers truncated to five.
    let view = wait_for_dashboard(&client, &base, |v| {
        settled(v) && v["has_any_data"] == true
    })
    .await;
    assert_eq!(view["filter"]["active"], false);
    assert_eq!(view["stats"]["revenue"]["value"], "$21,000.00");
    assert_eq!(view["stats"]["page_views"]["value"], "15.2k");
    assert_eq!(view["stats"]["active_now"]["value"], "573");
    assert_eq!(view["chart"]["points"].as_array().unwrap().len(), 20);
    assert_eq!(view["customers"]["rows"].as_array().unwrap().len(), 5);
    assert_eq!(view["customers"]["rows"][0]["name"], "Olivia Martin");
    assert!(view["debug_info"].is_null());

    // Selecting a complete interval activates filtering.
    let response = client
        .put(format!("{base}/api/v1/dashboard/filter"))
        .json(&json!({ "start": "2024-01-05", "end": "2024-01-10" }))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["active"], true);

    let view = dashboard(&client, &base).await;
    assert_eq!(view["chart"]["points"].as_array().unwrap().len(), 6);
    assert_eq!(view["stats"]["revenue"]["value"], "$4,500.00");
    assert_eq!(view["stats"]["subscriptions"]["value"], "3");
    assert_eq!(view["customers"]["rows"].as_array().unwrap().len(), 3);

    // An incomplete selection keeps the flag but filters nothing.
    client
        .put(format!("{base}/api/v1/dashboard/filter"))
        .json(&json!({ "start": "2024-01-05", "end": null }))
        .send()
        .await
        .unwrap();
    let view = dashboard(&client, &base).await;
    assert_eq!(view["filter"]["active"], true);
    assert_eq!(view["chart"]["points"].as_array().unwrap().len(), 20);

    client
        .put(format!("{base}/api/v1/dashboard/filter"))
        .json(&json!({ "start": "2024-01-05", "end": "2024-01-10" }))
        .send()
        .await
        .unwrap();

    // Toggling off shows everything again; the interval is remembered.
    client
        .put(format!("{base}/api/v1/dashboard/filter/active"))
        .json(&json!({ "active": false }))
        .send()
        .await
        .unwrap();
    let view = dashboard(&client, &base).await;
    assert_eq!(view["filter"]["active"], false);
    assert_eq!(view["filter"]["start"], "2024-01-05");
    assert_eq!(view["chart"]["points"].as_array().unwrap().len(), 20);
    assert_eq!(view["customers"]["rows"].as_array().unwrap().len(), 5);

    // Toggling back on reproduces the same filtered output.
    client
        .put(format!("{base}/api/v1/dashboard/filter/active"))
        .json(&json!({ "active": true }))
        .send()
        .await
        .unwrap();
    let view = dashboard(&client, &base).await;
    assert_eq!(view["chart"]["points"].as_array().unwrap().len(), 6);
    assert_eq!(view["stats"]["revenue"]["value"], "$4,500.00");

    // Sign-out empties the dashboard on the next cycle.
    client
        .post(format!("{base}/api/v1/auth/logout"))
        .send()
        .await
        .unwrap();
    let session: Value = client
        .get(format!("{base}/api/v1/auth/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(session["data"].is_null());

    let view = wait_for_dashboard(&client, &base, |v| {
        settled(v) && v["has_any_data"] == false
    })
    .await;
    assert!(view["debug_info"]
        .as_str()
        .unwrap()
        .contains("No authenticated user"));
}

#[tokio::test]
async fn failed_read_leaves_other_reads_intact() {
    let (platform, stub) = start_platform_stub().await;
    stub.fail_views.store(true, Ordering::SeqCst);
    let base = start_app(&platform).await;
    let client = Client::new();

    client
        .post(format!("{base}/api/v1/auth/login"))
        .json(&json!({ "email": DEMO_EMAIL, "password": DEMO_PASS }))
        .send()
        .await
        .unwrap();

    let view = wait_for_dashboard(&client, &base, |v| {
        settled(v) && v["has_any_data"] == true
    })
    .await;

    // The failing read stays empty; the other three are unaffected and the
    // cycle still completed without a user-visible error.
    assert_eq!(view["stats"]["page_views"]["value"], "0");
    assert_eq!(view["chart"]["points"].as_array().unwrap().len(), 20);
    assert_eq!(view["stats"]["active_now"]["value"], "573");
    assert!(view["error"].is_null());
    let debug_info = view["debug_info"].as_str().unwrap();
    assert!(debug_info.contains("page views: error: permission denied"));
    assert!(debug_info.contains("sales: 20 rows"));
}

#[tokio::test]
async fn unauthenticated_cycle_issues_no_store_reads() {
    let (platform, stub) = start_platform_stub().await;
    let base = start_app(&platform).await;
    let client = Client::new();

    let view = wait_for_dashboard(&client, &base, settled).await;
    assert_eq!(view["has_any_data"], false);
    assert!(view["debug_info"].is_string());
    assert_eq!(stub.store_hits.load(Ordering::SeqCst), 0);
}
