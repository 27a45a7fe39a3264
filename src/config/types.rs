// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub models: ModelsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Directory the front-end page is served from
    pub static_dir: String,
    /// Front-end page, also reachable under its own name
    pub html_file: String,
    pub max_body_size: u64,
    /// CORS headers on the OPTIONS preflight. JSON responses always carry
    /// `Access-Control-Allow-Origin: *` regardless of this flag.
    pub preflight_cors: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Log line format: `compact` or `json`
    pub format: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Upper bound in seconds for serving one connection, 0 disables it
    pub connection_timeout: u64,
}

/// Model configuration
#[derive(Debug, Deserialize, Clone)]
#[cfg_attr(not(feature = "tensorflow"), allow(dead_code))]
pub struct ModelsConfig {
    pub dir: String,
    /// Version -> file name inside `dir`
    #[serde(default = "default_model_versions")]
    pub versions: BTreeMap<String, String>,
    pub input_size: u32,
    pub input_op: String,
    pub output_op: String,
}

fn default_model_versions() -> BTreeMap<String, String> {
    (1..=3)
        .map(|n| (format!("v{n}"), format!("document_classifier_v{n}.pb")))
        .collect()
}
