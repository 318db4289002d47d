//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, warn};

use crate::{
    error::Error,
    readouts::{BoostSales, SpeedGauge, DEFAULT_GAUGE_MAX, DEFAULT_GAUGE_MIN, DEFAULT_GAUGE_UNITS},
    state::{AppState, Panel, PanelView, PlayerSnapshot, Station},
};
use super::responses::{
    ApiResponse, BoostSalesQuery, HealthResponse, SelectRequest, SpeedQuery, StatusResponse,
    VolumeRequest,
};

/// Map an error to a status code, logging it at a matching level
fn error_status(context: &str, e: &Error) -> StatusCode {
    match e {
        Error::UnknownPanel(_) | Error::StationNotFound(_) => {
            warn!("{}: {}", context, e);
            StatusCode::NOT_FOUND
        }
        Error::InvalidVolume(_) => {
            warn!("{}: {}", context, e);
            StatusCode::BAD_REQUEST
        }
        _ => {
            error!("{}: {}", context, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Build a response carrying the current site snapshot
fn respond(state: &AppState, changed: bool, message: String) -> Result<Json<ApiResponse>, StatusCode> {
    let snapshot = state
        .snapshot()
        .map_err(|e| error_status("Failed to read site state", &e))?;
    Ok(Json(if changed {
        ApiResponse::ok(message, snapshot)
    } else {
        ApiResponse::unchanged(message, snapshot)
    }))
}

/// Handle POST /panel/:name/open - Show a panel
pub async fn open_panel_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let target: Panel = name
        .parse()
        .map_err(|e| error_status("Rejected panel request", &e))?;

    let navigation = state
        .panels
        .open(target)
        .map_err(|e| error_status("Failed to open panel", &e))?;
    if !navigation.changed {
        return respond(&state, false, format!("Panel {} already open", target));
    }
    state.record_action(format!("open {}", target));
    respond(&state, true, format!("Opening panel {}", target))
}

/// Handle POST /panel/close - Return to the home view
pub async fn close_panel_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let navigation = state
        .panels
        .close()
        .map_err(|e| error_status("Failed to close panel", &e))?;
    if !navigation.changed {
        return respond(&state, false, "No panel open".to_string());
    }
    state.record_action("close panel");
    respond(&state, true, "Closing panel".to_string())
}

/// Handle GET /panel - Current panel state
pub async fn panel_handler(State(state): State<Arc<AppState>>) -> Result<Json<PanelView>, StatusCode> {
    state
        .panels
        .state()
        .map(|s| Json(PanelView::from(s)))
        .map_err(|e| error_status("Failed to read panel state", &e))
}

/// Handle GET /stations - Station list in play order
pub async fn stations_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Station>> {
    Json(state.player.stations().iter().cloned().collect())
}

/// Handle GET /player - Current player state
pub async fn player_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlayerSnapshot>, StatusCode> {
    state
        .player
        .snapshot()
        .map(Json)
        .map_err(|e| error_status("Failed to read player state", &e))
}

/// Handle POST /player/next - Tune to the next station
pub async fn next_station_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let player = state
        .player
        .next()
        .map_err(|e| error_status("Failed to switch station", &e))?;
    state.record_action("next station");
    respond(&state, true, format!("Tuning to {}", player.station.name))
}

/// Handle POST /player/previous - Tune to the previous station
pub async fn previous_station_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let player = state
        .player
        .previous()
        .map_err(|e| error_status("Failed to switch station", &e))?;
    state.record_action("previous station");
    respond(&state, true, format!("Tuning to {}", player.station.name))
}

/// Handle POST /player/select - Tune to a station by index or URL
pub async fn select_station_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let result = match &request {
        SelectRequest::Index { index } => state.player.select(*index),
        SelectRequest::Url { url } => state.player.select_url(url),
    };
    let selection = result.map_err(|e| error_status("Failed to select station", &e))?;

    let name = &selection.snapshot.station.name;
    if !selection.changed {
        return respond(&state, false, format!("Already tuned to {}", name));
    }
    state.record_action(format!("select {}", name));
    respond(&state, true, format!("Tuning to {}", name))
}

/// Handle POST /player/toggle - Play or pause
pub async fn toggle_playback_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let player = state
        .player
        .toggle_playback()
        .map_err(|e| error_status("Failed to toggle playback", &e))?;

    let message = if player.loading {
        state.record_action("play");
        format!("Starting {}", player.station.name)
    } else {
        state.record_action("pause");
        "Playback paused".to_string()
    };
    respond(&state, true, message)
}

/// Handle POST /player/volume - Set the volume
pub async fn volume_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VolumeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let player = state
        .player
        .set_volume(request.volume)
        .map_err(|e| error_status("Failed to set volume", &e))?;
    state.record_action("volume");
    respond(&state, true, format!("Volume set to {:.1}", player.volume))
}

/// Handle POST /player/mute - Toggle mute
pub async fn mute_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let player = state
        .player
        .toggle_mute()
        .map_err(|e| error_status("Failed to toggle mute", &e))?;

    let message = if player.muted { "Muted" } else { "Unmuted" };
    state.record_action(message.to_lowercase());
    respond(&state, true, message.to_string())
}

/// Handle GET /readouts/boost-sales - Boost sale progress bar
pub async fn boost_sales_handler(Query(query): Query<BoostSalesQuery>) -> Json<BoostSales> {
    Json(BoostSales::new(query.sold, query.total))
}

/// Handle GET /readouts/speed - Speed gauge needle
pub async fn speed_gauge_handler(Query(query): Query<SpeedQuery>) -> Json<SpeedGauge> {
    Json(SpeedGauge::new(
        query.value,
        query.min.unwrap_or(DEFAULT_GAUGE_MIN),
        query.max.unwrap_or(DEFAULT_GAUGE_MAX),
        query.units.unwrap_or_else(|| DEFAULT_GAUGE_UNITS.to_string()),
    ))
}

/// Handle GET /events - Server-sent panel and player changes
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().event(event.name()).json_data(&event) {
                    Ok(sse) => return Some((Ok(sse), rx)),
                    Err(e) => warn!("Failed to encode state event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /status - Return current site status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = state
        .snapshot()
        .map_err(|e| error_status("Failed to read site state", &e))?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        panel: snapshot.panel,
        player: snapshot.player,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
