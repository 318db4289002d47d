//! Pitlane - A state-managed HTTP server for the motocats racing site
//!
//! This library owns the interactive state of the site: which overlay panel
//! is open (with animated switching) and the background radio player.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod readouts;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
