//! Static page serving module
//!
//! The front end is a single HTML file reachable under three paths.

use crate::config::Config;
use crate::error::AppError;
use crate::http;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::ErrorKind;
use tokio::fs;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Whether `path` addresses the front-end page
pub fn is_page_path(path: &str, html_file: &str) -> bool {
    matches!(path, "/" | "/index.html") || path.strip_prefix('/') == Some(html_file)
}

/// Serve the front-end page, or 404 for any other GET path
pub async fn serve_page(path: &str, config: &Config) -> Result<Response<Full<Bytes>>, AppError> {
    if !is_page_path(path, &config.http.html_file) {
        return Err(AppError::NotFound("Not Found".to_string()));
    }

    let file_path = config.html_path();
    let content = match fs::read(&file_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "{} not found in {}",
                config.http.html_file, config.http.static_dir
            )));
        }
        Err(e) => {
            return Err(AppError::Internal(format!(
                "Failed to read '{}': {e}",
                file_path.display()
            )));
        }
    };

    Ok(http::build_file_response(content, HTML_CONTENT_TYPE))
}
