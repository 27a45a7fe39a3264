//! Logger module
//!
//! Thin helpers over `tracing` so call sites read as events rather than
//! format strings:
//! - Server lifecycle logging
//! - Model loading logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::model::ModelRegistry;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once at
/// application startup.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docscan={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).json())
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .compact(),
            )
            .init();
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, models: &ModelRegistry) {
    tracing::info!("Server running at http://{addr}");
    tracing::info!(
        html = %config.html_path().display(),
        max_body_size = config.http.max_body_size,
        "Serving front end"
    );
    if models.is_empty() {
        tracing::warn!("No models loaded; every classify request will be rejected");
    } else {
        let versions: Vec<&str> = models.versions().collect();
        tracing::info!("Models available: {}", versions.join(", "));
    }
    tracing::info!("Press Ctrl+C to stop");
}

pub fn log_server_stopped() {
    tracing::info!("Stopped.");
}

pub fn log_model_loading(version: &str, path: &Path) {
    tracing::info!("Loading model {version} from {}", path.display());
}

pub fn log_model_loaded(version: &str) {
    tracing::info!("Model {version} ready");
}

pub fn log_model_skipped(version: &str, path: &Path, reason: &str) {
    tracing::warn!("Model {version} not loaded from {} ({reason}), skipping", path.display());
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::error!("Failed to serve connection: {err}");
}

pub fn log_request_failed(method: &str, path: &str, status: u16, message: &str) {
    if status >= 500 {
        tracing::error!(method, path, status, "{message}");
    } else {
        tracing::debug!(method, path, status, "{message}");
    }
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "docscan::access", "{}", entry.format(format));
}
