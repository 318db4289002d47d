//! Background tasks module
//!
//! This module contains the tasks spawned for delayed panel switches,
//! stream loads and stream fault handling.

pub mod panel_transition;
pub mod stream_load;

// Re-export main functions
pub use panel_transition::panel_transition_task;
pub use stream_load::{stream_fault_task, stream_load_task};
