//! Model collaborator module
//!
//! The classifier itself is opaque to the server: it receives a decoded RGB
//! image and returns a document / non-document probability pair.

pub mod preprocess;
mod registry;
#[cfg(feature = "tensorflow")]
mod tensorflow;

use image::RgbImage;
use serde::Serialize;
use thiserror::Error;

pub use registry::ModelRegistry;

/// Probability pair produced by a classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    pub document: f64,
    pub nondocument: f64,
}

/// Errors raised while loading a model or running inference
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum ModelError {
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Backend(String),

    #[error("model returned {0} outputs, expected at least 2")]
    UnexpectedOutput(usize),

    #[error("no inference backend compiled in (enable the `tensorflow` feature)")]
    BackendUnavailable,
}

/// A loaded classification model
pub trait Classifier: Send + Sync {
    fn classify(&self, image: &RgbImage) -> Result<Scores, ModelError>;
}

/// Decode uploaded bytes and run them through `model`
pub fn classify_bytes(model: &dyn Classifier, image_bytes: &[u8]) -> Result<Scores, ModelError> {
    let image = preprocess::decode(image_bytes)?;
    model.classify(&image)
}

/// Turn raw output probabilities into `Scores` (index 0 = document)
#[cfg_attr(not(feature = "tensorflow"), allow(dead_code))]
pub fn scores_from_probs(probs: &[f32]) -> Result<Scores, ModelError> {
    match probs {
        [document, nondocument, ..] => Ok(Scores {
            document: f64::from(*document),
            nondocument: f64::from(*nondocument),
        }),
        _ => Err(ModelError::UnexpectedOutput(probs.len())),
    }
}
