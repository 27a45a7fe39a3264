//! HTTP response building module
//!
//! JSON responses come in exactly two shapes, both sent with CORS allow-all:
//! `{"document": f, "nondocument": f}` on success and `{"error": "..."}` on failure.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::AppError;
use crate::model::Scores;

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Error envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Build JSON response with CORS header
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return fallback(
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"error":"Internal server error"}"#,
            );
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Content-Length", json.len())
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status, b"")
        })
}

/// Build 200 classification response
pub fn build_scores_response(scores: &Scores) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, scores)
}

/// Build error envelope response, status taken from the error
pub fn build_error_response(err: &AppError) -> Response<Full<Bytes>> {
    let message = err.to_string();
    let mut response = json_response(err.status(), &ErrorBody { error: &message });
    if matches!(err, AppError::MethodNotAllowed(_)) {
        response
            .headers_mut()
            .insert("Allow", hyper::header::HeaderValue::from_static(ALLOWED_METHODS));
    }
    response
}

/// Build 200 response for a static file
pub fn build_file_response(content: Vec<u8>, content_type: &str) -> Response<Full<Bytes>> {
    let content_length = content.len();

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            fallback(StatusCode::OK, b"")
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(preflight_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", ALLOWED_METHODS);

    if preflight_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        fallback(StatusCode::NO_CONTENT, b"")
    })
}

fn fallback(status: StatusCode, body: &'static [u8]) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body)));
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
