use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use weight_tracker::{
    dates::today,
    storage::{persist_cells, Cell},
    tips::TipClient,
    AppState, Config,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    info!(data_dir = %config.data_dir.display(), "loading weight log");

    let mut tracker = weight_tracker::load_tracker(&config.data_dir).await;
    if tracker.start_session(today()) {
        if let Err(err) = persist_cells(&config.data_dir, &tracker, &[Cell::Streak]).await {
            warn!("failed to persist streak reset: {}", err.message);
        }
    }
    info!(
        entries = tracker.store.len(),
        streak = tracker.settings.streak.count,
        "weight log loaded"
    );

    if config.tip.api_key.is_none() {
        info!("no tip API key configured, motivational tips use the fallback text");
    }
    let tips = TipClient::new(config.tip.clone())?;
    let state = AppState::new(config.data_dir.clone(), tracker, tips);
    let app = weight_tracker::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
