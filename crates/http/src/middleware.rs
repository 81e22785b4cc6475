//! Request-body validation middleware.

use axum::{
    body::Body,
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::error::{ApiError, MessageBody};

/// Message returned whenever a mutating request carries no usable body.
pub const EMPTY_BODY_MESSAGE: &str = "Request body cannot be empty";

/// Upper bound for buffered request bodies, matching axum's default limit.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Reject mutating requests whose body is structurally empty.
///
/// A body is empty when it carries zero keys or when *any* present key maps
/// to the empty string; the scan covers every key, not just the expected
/// ones. Non-object and malformed JSON pass through so the extractor can
/// produce its own rejection. Reads other than POST/PUT are never gated.
pub async fn require_non_empty_body(request: Request, next: Next) -> Response {
    if !matches!(*request.method(), Method::POST | Method::PUT) {
        return next.run(request).await;
    }

    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().starts_with("application/json"))
        .unwrap_or(false);

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(MessageBody::new("Request body too large")),
            )
                .into_response();
        }
    };

    if violates_body_rules(is_json, &bytes) {
        return ApiError::validation(EMPTY_BODY_MESSAGE).into_response();
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    next.run(request).await
}

/// Apply the empty-body rules to a buffered request body.
///
/// A missing/non-JSON content type deserializes to no fields at all, which
/// rule 1 (zero keys) already covers.
fn violates_body_rules(is_json: bool, bytes: &[u8]) -> bool {
    if !is_json || bytes.is_empty() {
        return true;
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => {
            map.is_empty()
                || map
                    .values()
                    .any(|value| matches!(value, Value::String(s) if s.is_empty()))
        }
        // Malformed or non-object bodies fall through to the extractor.
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn empty_bytes_violate_rules() {
        assert!(violates_body_rules(true, b""));
    }

    #[test]
    fn missing_json_content_type_violates_rules() {
        assert!(violates_body_rules(false, br#"{"title":"Dune"}"#));
    }

    #[test]
    fn empty_object_violates_rules() {
        assert!(violates_body_rules(true, b"{}"));
    }

    #[test]
    fn any_empty_string_value_violates_rules() {
        assert!(violates_body_rules(
            true,
            br#"{"title":"Dune","author":""}"#
        ));
        assert!(violates_body_rules(true, br#"{"unrelated":""}"#));
    }

    #[test]
    fn populated_object_passes_rules() {
        assert!(!violates_body_rules(
            true,
            br#"{"title":"Dune","author":"Frank Herbert"}"#
        ));
    }

    #[test]
    fn non_object_and_malformed_bodies_pass_through() {
        // The extractor, not this middleware, rejects these.
        assert!(!violates_body_rules(true, b"[1,2,3]"));
        assert!(!violates_body_rules(true, b"{not json"));
        assert!(!violates_body_rules(true, b"null"));
    }

    fn app() -> Router {
        async fn echo(body: String) -> String {
            body
        }

        Router::new()
            .route("/", get(|| async { "listed" }).post(echo).put(echo))
            .layer(axum::middleware::from_fn(require_non_empty_body))
    }

    #[tokio::test]
    async fn rejects_post_without_content_type() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"title":"Dune"}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], EMPTY_BODY_MESSAGE);
    }

    #[tokio::test]
    async fn rejects_put_with_empty_object() {
        let request = HttpRequest::builder()
            .method("PUT")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn restores_body_for_downstream_handler() {
        let payload = r#"{"title":"Dune"}"#;
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), payload.as_bytes());
    }

    #[tokio::test]
    async fn get_requests_are_never_gated() {
        let request = HttpRequest::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
