//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/panel", get(panel_handler))
        .route("/panel/close", post(close_panel_handler))
        .route("/panel/:name/open", post(open_panel_handler))
        .route("/stations", get(stations_handler))
        .route("/player", get(player_handler))
        .route("/player/next", post(next_station_handler))
        .route("/player/previous", post(previous_station_handler))
        .route("/player/select", post(select_station_handler))
        .route("/player/toggle", post(toggle_playback_handler))
        .route("/player/volume", post(volume_handler))
        .route("/player/mute", post(mute_handler))
        .route("/readouts/boost-sales", get(boost_sales_handler))
        .route("/readouts/speed", get(speed_gauge_handler))
        .route("/events", get(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
