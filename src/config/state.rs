// Application state module
// Everything a request handler may read; built once at startup, never mutated

use super::types::Config;
use crate::model::ModelRegistry;

/// Application state
pub struct AppState {
    pub config: Config,
    pub models: ModelRegistry,
}

impl AppState {
    pub const fn new(config: Config, models: ModelRegistry) -> Self {
        Self { config, models }
    }
}
