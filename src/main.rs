//! Pitlane - A state-managed HTTP server for the motocats racing site
//!
//! This is the main entry point for the pitlane application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pitlane::{
    config::Config,
    state::AppState,
    api::create_router,
    services::HttpStreamBackend,
    tasks::stream_fault_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pitlane={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pitlane server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, transition={}ms, volume={}",
          config.host, config.port, config.transition_ms, config.volume);

    let stations = config.load_stations()?;
    info!("Radio has {} stations", stations.len());

    // Create application state
    let (state, faults) = AppState::new(
        config.port,
        config.host.clone(),
        config.transition_delay(),
        config.volume,
        stations,
        Arc::new(HttpStreamBackend::new()),
    );
    let state = Arc::new(state);

    // Route stream faults back into the player
    let player = state.player.clone();
    tokio::spawn(async move {
        stream_fault_task(player, faults).await;
    });

    // The site starts the first station as soon as it loads
    state.player.start()?;

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /panel/:name/open - Open leaderboard, garage, tune, calculator or rules");
    info!("  POST /panel/close      - Close the open panel");
    info!("  GET  /panel            - Current panel");
    info!("  GET  /stations         - Radio station list");
    info!("  GET  /player           - Radio player state");
    info!("  POST /player/next      - Next station");
    info!("  POST /player/previous  - Previous station");
    info!("  POST /player/select    - Select station by index or url");
    info!("  POST /player/toggle    - Play / pause");
    info!("  POST /player/volume    - Set volume");
    info!("  POST /player/mute      - Toggle mute");
    info!("  GET  /readouts/*       - Boost sales and speed gauge");
    info!("  GET  /events           - Server-sent state changes");
    info!("  GET  /status           - Check current status");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
