// Model registry
// Resolves configured model versions at startup; read-only afterwards

use std::collections::BTreeMap;
use std::path::Path;

use super::{Classifier, ModelError};
use crate::config::ModelsConfig;
use crate::logger;

/// Loaded models keyed by version string
pub struct ModelRegistry {
    models: BTreeMap<String, Box<dyn Classifier>>,
}

impl ModelRegistry {
    /// Load every configured version found on disk.
    ///
    /// Missing files and load failures are logged and skipped; the server
    /// still starts and reports those versions as not loaded.
    pub fn load(config: &ModelsConfig) -> Self {
        let mut models = BTreeMap::new();

        for (version, file) in &config.versions {
            let path = Path::new(&config.dir).join(file);
            if !path.is_file() {
                logger::log_model_skipped(version, &path, "file not found");
                continue;
            }

            logger::log_model_loading(version, &path);
            match load_model(&path, config) {
                Ok(model) => {
                    logger::log_model_loaded(version);
                    models.insert(version.clone(), model);
                }
                Err(e) => logger::log_model_skipped(version, &path, &e.to_string()),
            }
        }

        Self { models }
    }

    /// Build a registry from already constructed models
    #[cfg(test)]
    pub fn from_models<I>(models: I) -> Self
    where
        I: IntoIterator<Item = (String, Box<dyn Classifier>)>,
    {
        Self {
            models: models.into_iter().collect(),
        }
    }

    pub fn get(&self, version: &str) -> Option<&dyn Classifier> {
        self.models.get(version).map(AsRef::as_ref)
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(feature = "tensorflow")]
fn load_model(path: &Path, config: &ModelsConfig) -> Result<Box<dyn Classifier>, ModelError> {
    let model = super::tensorflow::TfModel::load(path, config)?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "tensorflow"))]
fn load_model(_path: &Path, _config: &ModelsConfig) -> Result<Box<dyn Classifier>, ModelError> {
    Err(ModelError::BackendUnavailable)
}
