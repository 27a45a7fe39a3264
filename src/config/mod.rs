// Configuration module entry point
// Loads the startup configuration and holds the immutable application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, ModelsConfig};

/// Default config file, without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// A missing file is fine: defaults and `DOCSCAN__*` environment variables apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DOCSCAN").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("http.static_dir", ".")?
            .set_default("http.html_file", "document-classifier.html")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("http.preflight_cors", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.connection_timeout", 120)?
            .set_default("models.dir", "models")?
            .set_default("models.input_size", 224)?
            .set_default("models.input_op", "x")?
            .set_default("models.output_op", "Identity")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let host = if self.server.host == "localhost" {
            "127.0.0.1"
        } else {
            self.server.host.as_str()
        };
        format!("{host}:{}", self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Path of the front-end page on disk
    pub fn html_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.http.static_dir).join(&self.http.html_file)
    }
}
