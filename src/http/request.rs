//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sends none
//! - Extract the flat parameter map from query string, form body, or JSON body
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body reads are bounded; oversized bodies are parse errors

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request};
use percent_encoding::percent_decode;
use std::borrow::Cow;
use std::collections::HashMap;
use thiserror::Error;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::watchlist::Query;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 for every request lacking an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID header value, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Why a request's parameters could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed form component '{0}'")]
    Form(String),
}

/// Extract the parameter map of a request.
///
/// - GET: URL query string.
/// - POST: form-encoded body, falling back to the query string for keys the
///   body lacks; a JSON `Content-Type` switches to the JSON rule.
/// - Anything else: body decoded as a flat JSON object of strings.
pub async fn extract_query(request: Request<Body>, body_limit: usize) -> Result<Query, ParseError> {
    let (parts, body) = request.into_parts();
    let url_query = match parts.uri.query() {
        Some(q) => parse_form(q.as_bytes())?,
        None => Query::default(),
    };

    if parts.method == Method::GET {
        return Ok(url_query);
    }

    let bytes = axum::body::to_bytes(body, body_limit).await?;

    if parts.method == Method::POST && !is_json(&parts.headers) {
        let mut query = parse_form(&bytes)?;
        query.merge_missing(url_query);
        return Ok(query);
    }

    let contents: HashMap<String, String> = serde_json::from_slice(&bytes)?;
    Ok(Query::new(contents))
}

/// Strict `application/x-www-form-urlencoded` decoding.
///
/// Every `%` must start a two-digit hex escape and every decoded component
/// must be valid UTF-8.
fn parse_form(input: &[u8]) -> Result<Query, ParseError> {
    let mut pairs = Vec::new();
    for pair in input.split(|&b| b == b'&').filter(|p| !p.is_empty()) {
        let (name, value) = match pair.iter().position(|&b| b == b'=') {
            Some(i) => (&pair[..i], &pair[i + 1..]),
            None => (pair, &pair[pair.len()..]),
        };
        pairs.push((decode_component(name)?, decode_component(value)?));
    }
    Ok(Query::from_pairs(pairs))
}

fn decode_component(raw: &[u8]) -> Result<String, ParseError> {
    let malformed = || ParseError::Form(String::from_utf8_lossy(raw).into_owned());

    let mut rest = raw;
    while let Some(i) = rest.iter().position(|&b| b == b'%') {
        match rest.get(i + 1..i + 3) {
            Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => rest = &rest[i + 3..],
            _ => return Err(malformed()),
        }
    }

    let spaced: Vec<u8> = raw.iter().map(|&b| if b == b'+' { b' ' } else { b }).collect();
    percent_decode(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| malformed())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024;

    fn request(method: Method, uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_get_uses_query_string() {
        let req = request(Method::GET, "/watchlist?action=add&id=a&id=b&title=Hello%20World", None, "");
        let query = extract_query(req, LIMIT).await.unwrap();
        assert_eq!(query.get("action"), Some("add"));
        assert_eq!(query.get("id"), Some("a"));
        assert_eq!(query.get("title"), Some("Hello World"));
    }

    #[tokio::test]
    async fn test_post_form_body_wins_over_query() {
        let req = request(
            Method::POST,
            "/watchlist?action=remove&db=fromquery",
            Some("application/x-www-form-urlencoded"),
            "action=add&id=e1&title=Foo+Bar",
        );
        let query = extract_query(req, LIMIT).await.unwrap();
        assert_eq!(query.get("action"), Some("add"));
        assert_eq!(query.get("db"), Some("fromquery"));
        assert_eq!(query.get("title"), Some("Foo Bar"));
    }

    #[tokio::test]
    async fn test_post_json_content_type() {
        let req = request(
            Method::POST,
            "/watchlist",
            Some("application/json; charset=utf-8"),
            r#"{"action":"new"}"#,
        );
        let query = extract_query(req, LIMIT).await.unwrap();
        assert_eq!(query.get("action"), Some("new"));
    }

    #[tokio::test]
    async fn test_other_methods_decode_json() {
        let req = request(Method::PUT, "/watchlist", None, r#"{"action":"remove","db":"x","id":"1"}"#);
        let query = extract_query(req, LIMIT).await.unwrap();
        assert_eq!(query.get("db"), Some("x"));
        assert_eq!(query.get("id"), Some("1"));
    }

    #[tokio::test]
    async fn test_json_errors() {
        let malformed = request(Method::PUT, "/watchlist", None, "{not json");
        assert!(matches!(extract_query(malformed, LIMIT).await, Err(ParseError::Json(_))));

        let non_string = request(Method::PUT, "/watchlist", None, r#"{"prio":5}"#);
        assert!(matches!(extract_query(non_string, LIMIT).await, Err(ParseError::Json(_))));

        let empty = request(Method::DELETE, "/watchlist", None, "");
        assert!(matches!(extract_query(empty, LIMIT).await, Err(ParseError::Json(_))));
    }

    #[tokio::test]
    async fn test_body_limit() {
        let body = format!("title={}", "x".repeat(LIMIT * 2));
        let req = request(Method::POST, "/watchlist", None, &body);
        assert!(matches!(extract_query(req, LIMIT).await, Err(ParseError::Body(_))));
    }

    #[tokio::test]
    async fn test_malformed_form_rejected() {
        let bodies: [&[u8]; 4] = [b"action=add&db=x&id=e1&title=%zz", b"title=%f", b"title=%ff", b"title=\xff"];
        for body in bodies {
            let req = Request::builder()
                .method(Method::POST)
                .uri("/watchlist")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_vec()))
                .unwrap();
            assert!(
                matches!(extract_query(req, LIMIT).await, Err(ParseError::Form(_))),
                "{body:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_query_string_rejected() {
        let req = request(Method::GET, "/watchlist?action=add&title=%G1", None, "");
        assert!(matches!(extract_query(req, LIMIT).await, Err(ParseError::Form(_))));
    }

    #[tokio::test]
    async fn test_form_decodes_utf8_escapes() {
        let req = request(
            Method::POST,
            "/watchlist",
            Some("application/x-www-form-urlencoded"),
            "title=Am%C3%A9lie+%2B+co&flag",
        );
        let query = extract_query(req, LIMIT).await.unwrap();
        assert_eq!(query.get("title"), Some("Amélie + co"));
        assert_eq!(query.get("flag"), None);
    }

    #[test]
    fn test_request_id_generation() {
        let req = Request::builder().body(()).unwrap();
        let id = MakeRequestUuidV4.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[test]
    fn test_request_id_lookup() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));
        assert_eq!(request_id(&headers), "abc");
    }
}
