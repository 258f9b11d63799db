//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorCode::DocumentInvalid, StatusCode::INTERNAL_SERVER_ERROR)]
#[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] code: ErrorCode, #[case] status: StatusCode) {
    assert_eq!(status_for(code), status);
    assert_eq!(ResponseError::status_code(&Error::new(code, "x")), status);
}

async fn render(error: Error) -> (StatusCode, Option<String>, ErrorEnvelope) {
    let response = ResponseError::error_response(&error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let envelope = serde_json::from_slice(&bytes).expect("envelope deserialises");
    (status, header, envelope)
}

#[rstest]
#[actix_web::test]
async fn invalid_request_envelope_prefixes_status(expected_trace_id: String) {
    let error = Error::invalid_request("invalid UUID: abc")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "key"}));

    let (status, header, envelope) = render(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(envelope.error, "400: invalid UUID: abc");
    assert_eq!(envelope.code, ErrorCode::InvalidRequest);
    assert_eq!(envelope.trace_id, Some(expected_trace_id));
    assert_eq!(envelope.details, Some(json!({"field": "key"})));
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection refused to 10.0.0.3")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let (status, header, envelope) = render(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(envelope.error, "500: Internal server error");
    assert_eq!(envelope.code, ErrorCode::InternalError);
    assert!(envelope.details.is_none());
}

#[rstest]
#[actix_web::test]
async fn document_invalid_keeps_its_code_and_detail() {
    let error = Error::document_invalid("stored document for user 1 is invalid");

    let (status, _, envelope) = render(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(envelope.code, ErrorCode::DocumentInvalid);
    assert_eq!(
        envelope.error,
        "500: stored document for user 1 is invalid"
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_header_and_field() {
    let (_, header, envelope) = render(Error::not_found("gone")).await;

    assert!(header.is_none());
    assert!(envelope.trace_id.is_none());
    assert_eq!(envelope.error, "404: gone");
}

#[rstest]
#[actix_web::test]
async fn unmatched_routes_use_the_envelope() {
    let app = actix_test::init_service(App::new().default_service(web::to(route_not_found))).await;
    let req = actix_test::TestRequest::get().uri("/nowhere").to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
    assert_eq!(envelope.code, ErrorCode::NotFound);
    assert_eq!(envelope.error, "404: no route for GET /nowhere");
}
