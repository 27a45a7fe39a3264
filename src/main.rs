use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod model;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg.logging);

    let models = model::ModelRegistry::load(&cfg.models);

    // One thread: requests are served strictly one after another
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg, models))
}

async fn async_main(
    cfg: config::Config,
    models: model::ModelRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, &cfg, &models);

    let state = Arc::new(config::AppState::new(cfg, models));
    server::run(listener, state).await?;
    Ok(())
}
