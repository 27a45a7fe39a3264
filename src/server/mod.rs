// Server module entry point
// Listener creation and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

// Re-export commonly used types
pub use listener::create_listener;

/// Accept and serve connections until a shutdown signal arrives.
///
/// Each connection is served to completion before the next one is accepted,
/// so requests never overlap.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let shutdown = signal::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::serve_connection(stream, peer_addr, Arc::clone(&state)).await;
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_server_stopped();
                return Ok(());
            }
        }
    }
}
