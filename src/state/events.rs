//! State change notifications

use serde::{Deserialize, Serialize};

use super::{Chrome, Panel, PanelState, Station};

/// Panel state as published to clients, with derived chrome visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelView {
    pub active: Panel,
    pub closing: bool,
    pub chrome: Chrome,
}

impl From<PanelState> for PanelView {
    fn from(state: PanelState) -> Self {
        Self {
            active: state.active,
            closing: state.closing,
            chrome: state.chrome(),
        }
    }
}

/// Player state as published to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub station: Station,
    pub index: usize,
    pub station_count: usize,
    pub playing: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub volume: f32,
    pub muted: bool,
    pub bytes_received: u64,
}

/// Broadcast whenever the panel router or the player changes state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StateEvent {
    Panel(PanelView),
    Player(PlayerSnapshot),
}

impl StateEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            StateEvent::Panel(_) => "panel",
            StateEvent::Player(_) => "player",
        }
    }
}
