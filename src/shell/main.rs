use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use read_history::shared::core::clock::SystemClock;
use read_history::shell::config::Config;
use read_history::shell::http::router;
use read_history::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // In-memory read log for now
    let state = AppState::in_memory(Arc::new(SystemClock));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("read history service listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
