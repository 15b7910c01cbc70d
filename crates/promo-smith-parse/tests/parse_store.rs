//! Exercises `ParseStore` against an in-process fake Parse server.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use promo_smith::{
    AllocationRecord, Allocator, AllocatorConfig, NamingScheme, PromoStore, StoreError,
    ThreadRandom, UserId,
};
use promo_smith_parse::{ParseConfig, ParseCredential, ParseStore};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct SeenRequest {
    headers: HeaderMap,
    params: HashMap<String, String>,
    body: Option<Value>,
}

/// Minimal stand-in for the `/classes/{class}` endpoints.
///
/// Class names select behaviour: `Broken` always fails, `Slow` answers after
/// two seconds, `Unique` rejects duplicate `promoCodeId`s with code 137, and
/// `Bare` answers queries without a `results` field.
#[derive(Default)]
struct FakeParse {
    records: Mutex<Vec<Value>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl FakeParse {
    fn records(&self) -> Vec<Value> {
        self.records.lock().unwrap().clone()
    }

    fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn has_code(&self, code: &str) -> bool {
        self.records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r["promoCodeId"] == code)
    }
}

async fn query(
    State(fake): State<Arc<FakeParse>>,
    Path(class): Path<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    fake.seen.lock().unwrap().push(SeenRequest {
        headers,
        params: params.clone(),
        body: None,
    });

    match class.as_str() {
        "Broken" => return (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response(),
        "Slow" => tokio::time::sleep(Duration::from_secs(2)).await,
        "Bare" => return Json(json!({})).into_response(),
        _ => {}
    }

    let filter: Value = params
        .get("where")
        .and_then(|w| serde_json::from_str(w).ok())
        .unwrap_or(Value::Null);
    let wanted = filter["promoCodeId"].as_str().unwrap_or_default();
    let results: Vec<Value> = fake
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r["promoCodeId"] == wanted)
        .take(1)
        .cloned()
        .collect();

    Json(json!({ "results": results })).into_response()
}

async fn create(
    State(fake): State<Arc<FakeParse>>,
    Path(class): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    fake.seen.lock().unwrap().push(SeenRequest {
        headers,
        params: HashMap::new(),
        body: Some(body.clone()),
    });

    if class == "Broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let code = body["promoCodeId"].as_str().unwrap_or_default().to_string();
    if class == "Unique" && fake.has_code(&code) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "code": 137,
                "error": "A duplicate value for a field with unique values was provided",
            })),
        )
            .into_response();
    }

    fake.records.lock().unwrap().push(body);
    (
        StatusCode::CREATED,
        Json(json!({ "objectId": "abc123", "createdAt": "2024-09-06T11:52:13.070Z" })),
    )
        .into_response()
}

async fn serve() -> (SocketAddr, Arc<FakeParse>) {
    let fake = Arc::new(FakeParse::default());
    let app = Router::new()
        .route("/parse/classes/{class}", get(query).post(create))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, fake)
}

fn config(addr: SocketAddr, class: &str) -> ParseConfig {
    ParseConfig::new("app-1")
        .with_api_root(format!("http://{addr}/parse/"))
        .with_class_name(class)
        .with_credential(ParseCredential::pick(None, Some("rest-key".into())))
}

fn record(code: &str) -> AllocationRecord {
    AllocationRecord::new(
        code,
        &UserId::normalize("a@x.com"),
        &NamingScheme::default(),
    )
}

#[tokio::test]
async fn exists_reflects_inserted_records() {
    let (addr, fake) = serve().await;
    let store = ParseStore::new(&config(addr, "PromoCodeInfo")).unwrap();

    assert!(!store.exists("AVZ-2DA-AAAA").await.unwrap());
    store.insert(&record("AVZ-2DA-AAAA")).await.unwrap();
    assert!(store.exists("AVZ-2DA-AAAA").await.unwrap());
    assert!(!store.exists("AVZ-2DA-AAAB").await.unwrap());

    assert_eq!(
        fake.records(),
        [serde_json::to_value(record("AVZ-2DA-AAAA")).unwrap()]
    );
}

#[tokio::test]
async fn requests_carry_credentials_and_filter() {
    let (addr, fake) = serve().await;
    let store = ParseStore::new(&config(addr, "PromoCodeInfo")).unwrap();

    store.exists("AVZ-2DA-Q7ZB").await.unwrap();
    store.insert(&record("AVZ-2DA-Q7ZB")).await.unwrap();

    let seen = fake.seen();
    assert_eq!(seen.len(), 2);
    for request in &seen {
        assert_eq!(request.headers["x-parse-application-id"], "app-1");
        assert_eq!(request.headers["x-parse-rest-api-key"], "rest-key");
        assert!(!request.headers.contains_key("x-parse-master-key"));
    }

    let filter: Value = serde_json::from_str(&seen[0].params["where"]).unwrap();
    assert_eq!(filter, json!({ "promoCodeId": "AVZ-2DA-Q7ZB" }));
    assert_eq!(seen[0].params["limit"], "1");

    let body = seen[1].body.as_ref().unwrap();
    assert_eq!(body["promoCodeUser"], "a@x.com");
    assert_eq!(body["promoCodeDeviceCountLimit"], 1);
}

#[tokio::test]
async fn missing_results_field_means_not_found() {
    let (addr, _fake) = serve().await;
    let store = ParseStore::new(&config(addr, "Bare")).unwrap();

    assert!(!store.exists("AVZ-2DA-AAAA").await.unwrap());
}

#[tokio::test]
async fn error_statuses_are_store_faults() {
    let (addr, _fake) = serve().await;
    let store = ParseStore::new(&config(addr, "Broken")).unwrap();

    assert_eq!(
        store.exists("AVZ-2DA-AAAA").await,
        Err(StoreError::Status {
            status: 503,
            body: "maintenance".to_string()
        })
    );
    assert_eq!(
        store.insert(&record("AVZ-2DA-AAAA")).await,
        Err(StoreError::Status {
            status: 500,
            body: "boom".to_string()
        })
    );
}

#[tokio::test]
async fn unique_index_violation_is_a_duplicate() {
    let (addr, _fake) = serve().await;
    let store = ParseStore::new(&config(addr, "Unique")).unwrap();

    store.insert(&record("AVZ-2DA-AAAA")).await.unwrap();
    assert_eq!(
        store.insert(&record("AVZ-2DA-AAAA")).await,
        Err(StoreError::Duplicate {
            code: "AVZ-2DA-AAAA".to_string()
        })
    );
}

#[tokio::test]
async fn slow_responses_time_out() {
    let (addr, _fake) = serve().await;
    let store =
        ParseStore::new(&config(addr, "Slow").with_timeout(Duration::from_millis(100))).unwrap();

    assert_eq!(
        store.exists("AVZ-2DA-AAAA").await,
        Err(StoreError::Timeout)
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_fault() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = ParseStore::new(&config(addr, "PromoCodeInfo")).unwrap();
    assert!(matches!(
        store.exists("AVZ-2DA-AAAA").await,
        Err(StoreError::Transport { .. })
    ));
}

#[tokio::test]
async fn allocator_batch_writes_through_parse() {
    let (addr, fake) = serve().await;
    let store = ParseStore::new(&config(addr, "PromoCodeInfo")).unwrap();
    let users = [UserId::normalize("u1@x.com"), UserId::normalize("u2@x.com")];
    let scheme = NamingScheme::default().with_duration("30D");

    let report = Allocator::new(AllocatorConfig::default(), ThreadRandom)
        .allocate_batch(&users, &scheme, &store)
        .await;

    assert_eq!(report.error_count(), 0);
    let records = fake.records();
    assert_eq!(records.len(), 2);
    for (record, code) in records.iter().zip(report.codes()) {
        assert_eq!(record["promoCodeId"], code);
        assert_eq!(record["promoCodeDuration"], "30D");
        assert_eq!(record["promoCodeDistributionPartner"], "AVAZ");
    }
}
