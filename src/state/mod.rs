//! State management module
//!
//! This module contains the panel router, the radio player and the
//! controller that owns both.

pub mod app_state;
pub mod events;
pub mod panel_router;
pub mod panel_state;
pub mod player_state;
pub mod radio;

// Re-export main types
pub use app_state::{AppState, SiteSnapshot};
pub use events::{PanelView, PlayerSnapshot, StateEvent};
pub use panel_router::{Navigation, PanelRouter};
pub use panel_state::{Chrome, Panel, PanelState, PanelStep};
pub use player_state::{PlayerState, Station, StationList, DEFAULT_VOLUME};
pub use radio::{RadioPlayer, Selection};
