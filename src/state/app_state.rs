//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc};
use tracing::info;

use super::{PanelRouter, PanelView, PlayerSnapshot, RadioPlayer, StateEvent, StationList};
use crate::{
    error::Result,
    services::{StreamBackend, StreamFault},
};

/// Panel and player state at one instant
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SiteSnapshot {
    pub panel: PanelView,
    pub player: PlayerSnapshot,
}

/// Controller owning all interactive site state
pub struct AppState {
    /// Overlay navigation
    pub panels: PanelRouter,
    /// Background radio
    pub player: RadioPlayer,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Panel and player change notifications
    pub events: broadcast::Sender<StateEvent>,
}

impl AppState {
    /// Create the site state.
    ///
    /// The returned receiver must be handed to
    /// [`crate::tasks::stream_fault_task`] so mid-play stream faults reach
    /// the player.
    pub fn new(
        port: u16,
        host: String,
        transition_delay: Duration,
        volume: f32,
        stations: StationList,
        backend: Arc<dyn StreamBackend>,
    ) -> (Self, mpsc::UnboundedReceiver<StreamFault>) {
        let (events, _) = broadcast::channel(100);
        let panels = PanelRouter::new(transition_delay, events.clone());
        let (player, faults) = RadioPlayer::new(stations, backend, volume, events.clone());

        let state = Self {
            panels,
            player,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            events,
        };
        (state, faults)
    }

    /// Remember the most recent user action
    pub fn record_action(&self, action: impl Into<String>) {
        let action = action.into();
        info!("Action: {}", action);
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action);
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Current panel and player state
    pub fn snapshot(&self) -> Result<SiteSnapshot> {
        Ok(SiteSnapshot {
            panel: PanelView::from(self.panels.state()?),
            player: self.player.snapshot()?,
        })
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Stop the stream and drop any armed panel transition
    pub fn shutdown(&self) {
        self.panels.shutdown();
        self.player.shutdown();
        info!("Site state shut down");
    }
}
