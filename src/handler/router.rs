//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method dispatch and conversion of
//! failures into JSON error envelopes.

use crate::config::AppState;
use crate::error::AppError;
use crate::handler::{classify, static_files};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// Never fails: every error becomes a response for this request only.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let result = match method {
        Method::GET => static_files::serve_page(&path, &state.config).await,
        Method::POST => classify::handle_classify(req, &state).await,
        Method::OPTIONS => Ok(http::build_options_response(
            state.config.http.preflight_cors,
        )),
        _ => Err(AppError::MethodNotAllowed(method.to_string())),
    };

    let response = result.unwrap_or_else(|err| {
        logger::log_request_failed(
            method.as_str(),
            &path,
            err.status().as_u16(),
            &err.to_string(),
        );
        http::build_error_response(&err)
    });

    Ok(response)
}
