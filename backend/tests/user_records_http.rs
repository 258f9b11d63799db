//! End-to-end behaviour of the user record API over the in-memory store.
//!
//! The app is wired the way the server wires it (trace middleware, route
//! table, fallback 404) with the Diesel store swapped for
//! `InMemoryUserRecordStore` and a clock that ticks one second per reading.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use users_backend::Trace;
use users_backend::domain::ports::UserRecordStoreError;
use users_backend::domain::{MissingRecordPolicy, TRACE_ID_HEADER, UserId, UserRecordService};
use users_backend::inbound::http::error::route_not_found;
use users_backend::inbound::http::routes::ResourceRoutes;
use users_backend::inbound::http::state::HttpState;
use users_backend::test_support::clock::SteppingClock;
use users_backend::test_support::store::InMemoryUserRecordStore;

const BASE: &str = "/api/v1/namespace/acme/users";

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn store() -> Arc<InMemoryUserRecordStore> {
    Arc::new(InMemoryUserRecordStore::new())
}

fn app(
    store: Arc<InMemoryUserRecordStore>,
    policy: MissingRecordPolicy,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    app_with_routes(store, policy, ResourceRoutes::default())
}

fn app_with_routes(
    store: Arc<InMemoryUserRecordStore>,
    policy: MissingRecordPolicy,
    routes: ResourceRoutes,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let clock = SteppingClock::new(epoch(), Duration::seconds(1));
    let service =
        Arc::new(UserRecordService::new(store, Arc::new(clock)).with_missing_policy(policy));
    let state = web::Data::new(HttpState::new(service.clone(), service));

    App::new()
        .app_data(state)
        .wrap(Trace)
        .configure(move |cfg| routes.configure(cfg))
        .default_service(web::to(route_not_found))
}

/// Issue a request and return status, JSON body, and the trace header.
macro_rules! call {
    ($service:expr, $request:expr) => {{
        let response = actix_test::call_service(&$service, $request.to_request()).await;
        let status = response.status();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = actix_test::read_body(response).await;
        let body: Value = serde_json::from_slice(&bytes).expect("JSON body");
        (status, body, trace_id)
    }};
}

fn document(key: &str) -> Value {
    json!({"id": "x", "metadata": {"id": "m", "test": {"key": key}}})
}

fn timestamp(body: &Value, field: &str) -> DateTime<Utc> {
    body[field]
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.with_timezone(&Utc))
        .unwrap_or_else(|| panic!("{field} should be an RFC 3339 timestamp: {body}"))
}

fn assigned_id(body: &Value) -> String {
    body["usersuuid"]
        .as_str()
        .expect("usersuuid present")
        .to_owned()
}

#[rstest]
#[actix_web::test]
async fn created_record_round_trips(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;

    let (status, created, trace_id) = call!(
        service,
        TestRequest::post().uri(BASE).set_json(document("k"))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert!(trace_id.is_some());
    let id = assigned_id(&created);
    assert!(!id.is_empty());
    assert_ne!(id, "x");
    assert_eq!(timestamp(&created, "created"), timestamp(&created, "updated"));

    let (status, fetched, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}/{id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], "x");
    assert_eq!(fetched["metadata"], created["metadata"]);
    assert_eq!(fetched["usersuuid"], id.as_str());
    assert_eq!(fetched["created"], created["created"]);
}

#[rstest]
#[actix_web::test]
async fn declared_key_on_create_is_ignored(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;
    let declared = UserId::random().to_string();
    let mut body = document("k");
    body["usersuuid"] = json!(declared);

    let (status, created, _) = call!(service, TestRequest::post().uri(BASE).set_json(body));

    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(assigned_id(&created), declared);
}

#[rstest]
#[actix_web::test]
async fn update_replaces_document_and_advances_updated(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;
    let (_, created, _) = call!(
        service,
        TestRequest::post().uri(BASE).set_json(document("before"))
    );
    let id = assigned_id(&created);

    let (status, updated, _) = call!(
        service,
        TestRequest::put()
            .uri(&format!("{BASE}/{id}"))
            .set_json(document("after"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["created"], created["created"]);
    assert!(timestamp(&updated, "updated") > timestamp(&created, "updated"));

    let (_, fetched, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}/{id}"))
    );
    assert_eq!(fetched["metadata"]["test"]["key"], "after");
    assert_eq!(fetched["created"], created["created"]);
    assert_eq!(fetched["updated"], updated["updated"]);
}

#[rstest]
#[actix_web::test]
async fn update_with_conflicting_declared_key_is_rejected(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;
    let (_, created, _) = call!(
        service,
        TestRequest::post().uri(BASE).set_json(document("k"))
    );
    let id = assigned_id(&created);
    let mut body = document("k2");
    body["usersuuid"] = json!(UserId::random().to_string());

    let (status, error, _) = call!(
        service,
        TestRequest::put().uri(&format!("{BASE}/{id}")).set_json(body)
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn deleted_record_is_gone(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;
    let (_, created, _) = call!(
        service,
        TestRequest::post().uri(BASE).set_json(document("k"))
    );
    let id = assigned_id(&created);

    let (status, outcome, _) = call!(
        service,
        TestRequest::delete().uri(&format!("{BASE}/{id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({"result": "success"}));

    let (status, error, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}/{id}"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "not_found");

    let (status, _, _) = call!(
        service,
        TestRequest::delete().uri(&format!("{BASE}/{id}"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn unknown_valid_key_is_not_found(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;
    let id = UserId::random();

    let (status, error, trace_id) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}/{id}"))
    );

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["traceId"].as_str(), trace_id.as_deref());
}

#[rstest]
#[case("abc")]
#[case("3fa85f6457174562b3fc2c963f66afa6")]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa")]
#[case("not-a-uuid-at-all")]
#[actix_web::test]
async fn malformed_key_is_a_bad_request(
    store: Arc<InMemoryUserRecordStore>,
    #[case] key: &str,
) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;

    let (status, error, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}/{key}"))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], format!("400: invalid UUID: {key}"));
    assert_eq!(error["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn listing_an_empty_store_returns_an_empty_array(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;

    let (status, body, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}LIST?start=0&count=5"))
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[rstest]
#[case("count=50", 10)]
#[case("count=-1", 10)]
#[case("start=10&count=5", 2)]
#[case("", 10)]
#[case("count=5&count=6", 5)]
#[case("start=10&start=0&count=5", 2)]
#[actix_web::test]
async fn listing_clamps_the_window(
    store: Arc<InMemoryUserRecordStore>,
    #[case] query: &str,
    #[case] expected: usize,
) {
    for _ in 0..12 {
        store.insert_raw(UserId::random(), document("k"), epoch());
    }
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;

    let (status, body, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}LIST?{query}"))
    );

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().expect("array body");
    assert_eq!(entries.len(), expected);
    assert!(entries.iter().all(|entry| entry["uuid"].is_string()));
}

#[rstest]
#[actix_web::test]
async fn negative_start_lists_from_the_beginning(store: Arc<InMemoryUserRecordStore>) {
    for _ in 0..3 {
        store.insert_raw(UserId::random(), document("k"), epoch());
    }
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;

    let (_, from_zero, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}LIST?start=0&count=10"))
    );
    let (_, from_negative, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}LIST?start=-5&count=10"))
    );

    assert_eq!(from_zero, from_negative);
}

#[rstest]
#[case(MissingRecordPolicy::Acknowledge, StatusCode::OK)]
#[case(MissingRecordPolicy::Reject, StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn updating_a_missing_record_follows_the_policy(
    store: Arc<InMemoryUserRecordStore>,
    #[case] policy: MissingRecordPolicy,
    #[case] expected: StatusCode,
) {
    let service = actix_test::init_service(app(store.clone(), policy)).await;
    let id = UserId::random();

    let (status, body, _) = call!(
        service,
        TestRequest::put()
            .uri(&format!("{BASE}/{id}"))
            .set_json(document("k"))
    );

    assert_eq!(status, expected);
    if expected == StatusCode::OK {
        assert_eq!(body["metadata"]["test"]["key"], "k");
    }
    assert!(store.is_empty());
}

#[rstest]
#[actix_web::test]
async fn undecodable_stored_document_is_a_distinct_server_error(
    store: Arc<InMemoryUserRecordStore>,
) {
    let id = UserId::random();
    store.insert_raw(id, json!({"metadata": "flat"}), epoch());
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;

    let (status, error, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}/{id}"))
    );

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["code"], "document_invalid");
}

#[rstest]
#[actix_web::test]
async fn storage_outage_is_redacted(store: Arc<InMemoryUserRecordStore>) {
    store.set_failure(Some(UserRecordStoreError::connection(
        "password authentication failed for user root",
    )));
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;

    let (status, error, _) = call!(
        service,
        TestRequest::get().uri(&format!("{BASE}LIST"))
    );

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["code"], "internal_error");
    assert_eq!(error["error"], "500: Internal server error");
}

#[rstest]
#[actix_web::test]
async fn malformed_body_is_a_bad_request(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store.clone(), MissingRecordPolicy::default())).await;

    let (status, error, _) = call!(
        service,
        TestRequest::post()
            .uri(BASE)
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "invalid_request");
    assert!(store.is_empty());
}

#[rstest]
#[actix_web::test]
async fn bodies_beyond_the_framework_default_are_accepted(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;

    let (status, created, _) = call!(
        service,
        TestRequest::post()
            .uri(BASE)
            .set_json(json!({"id": "x", "blob": "a".repeat(300_000)}))
    );

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "x");
}

#[rstest]
#[actix_web::test]
async fn oversized_body_is_an_enveloped_bad_request(store: Arc<InMemoryUserRecordStore>) {
    let routes = ResourceRoutes::default().with_body_limit(1024);
    let service = actix_test::init_service(app_with_routes(
        store.clone(),
        MissingRecordPolicy::default(),
        routes,
    ))
    .await;
    let oversized = json!({"id": "x", "blob": "a".repeat(4096)});

    let (status, error, trace_id) = call!(
        service,
        TestRequest::post().uri(BASE).set_json(oversized.clone())
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "invalid_request");
    assert_eq!(error["details"]["code"], "unreadable_body");
    assert_eq!(error["traceId"].as_str(), trace_id.as_deref());
    assert!(store.is_empty());

    let (status, error, _) = call!(
        service,
        TestRequest::put()
            .uri(&format!("{BASE}/{}", UserId::random()))
            .set_json(oversized)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["code"], "unreadable_body");
}

#[rstest]
#[actix_web::test]
async fn unmatched_routes_use_the_error_envelope(store: Arc<InMemoryUserRecordStore>) {
    let service = actix_test::init_service(app(store, MissingRecordPolicy::default())).await;

    let (status, error, trace_id) = call!(
        service,
        TestRequest::get().uri("/api/v2/elsewhere")
    );

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "not_found");
    assert!(trace_id.is_some());
    assert_eq!(error["traceId"].as_str(), trace_id.as_deref());
}
