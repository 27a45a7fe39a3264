//! Classification endpoint
//!
//! `POST /classify/{version}` with a multipart body carrying an `image` field.

use crate::config::AppState;
use crate::error::AppError;
use crate::http::{self, multipart};
use crate::model;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Request, Response};

const IMAGE_FIELD: &str = "image";

/// Extract the model version from `/classify/{version}`
pub fn parse_classify_path(path: &str) -> Option<&str> {
    let mut segments = path.trim_matches('/').split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("classify"), Some(version), None) if !version.is_empty() => Some(version),
        _ => None,
    }
}

pub async fn handle_classify<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let version = parse_classify_path(req.uri().path())
        .ok_or_else(|| AppError::NotFound("Unknown endpoint".to_string()))?;

    let model = state
        .models
        .get(version)
        .ok_or_else(|| AppError::MalformedRequest(format!("Model '{version}' is not loaded.")))?;

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.contains("multipart/form-data") {
        return Err(AppError::MalformedRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let max_body_size = state.config.http.max_body_size;
    let declared_length = declared_content_length(req.headers())?;
    if let Some(size) = declared_length {
        if size > max_body_size {
            return Err(AppError::PayloadTooLarge { max: max_body_size });
        }
    }

    let body = read_body(req.into_body(), max_body_size).await?;
    // No Content-Length (chunked upload): take whatever arrived
    let content_length = declared_length
        .map_or(body.len(), |n| usize::try_from(n).unwrap_or(usize::MAX));

    let fields = multipart::parse_multipart(&body[..], &content_type, content_length)?;
    let image = fields.get(IMAGE_FIELD).ok_or_else(|| {
        AppError::MalformedRequest(format!("No '{IMAGE_FIELD}' field in form data"))
    })?;

    let scores = model::classify_bytes(model, image)?;
    Ok(http::build_scores_response(&scores))
}

fn declared_content_length(headers: &HeaderMap) -> Result<Option<u64>, AppError> {
    headers
        .get(CONTENT_LENGTH)
        .map(|value| {
            value
                .to_str()
                .ok()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .ok_or_else(|| AppError::MalformedRequest("Invalid Content-Length header".to_string()))
        })
        .transpose()
}

/// Collect the whole body, refusing to buffer more than `max` bytes
async fn read_body<B>(body: B, max: u64) -> Result<Bytes, AppError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(AppError::PayloadTooLarge { max })
        }
        Err(e) => Err(AppError::MalformedRequest(format!(
            "Failed to parse upload: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify_path() {
        assert_eq!(parse_classify_path("/classify/v1"), Some("v1"));
        assert_eq!(parse_classify_path("/classify/v2/"), Some("v2"));
        assert_eq!(parse_classify_path("/classify"), None);
        assert_eq!(parse_classify_path("/classify/"), None);
        assert_eq!(parse_classify_path("/classify//v1"), None);
        assert_eq!(parse_classify_path("/classify/v1/extra"), None);
        assert_eq!(parse_classify_path("/predict/v1"), None);
        assert_eq!(parse_classify_path("/"), None);
    }

    #[test]
    fn test_declared_content_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_content_length(&headers).unwrap(), None);

        headers.insert(CONTENT_LENGTH, "42".parse().unwrap());
        assert_eq!(declared_content_length(&headers).unwrap(), Some(42));

        headers.insert(CONTENT_LENGTH, "forty-two".parse().unwrap());
        assert!(matches!(
            declared_content_length(&headers),
            Err(AppError::MalformedRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_read_body_limit() {
        let body = Full::new(Bytes::from_static(b"0123456789"));
        assert!(matches!(
            read_body(body, 4).await,
            Err(AppError::PayloadTooLarge { max: 4 })
        ));

        let body = Full::new(Bytes::from_static(b"0123"));
        assert_eq!(read_body(body, 4).await.unwrap(), Bytes::from_static(b"0123"));
    }
}
