//! Delayed panel switch background task

use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::state::{Panel, PanelRouter};

/// Wait out the exit animation, then switch to `target` unless superseded
pub async fn panel_transition_task(router: PanelRouter, target: Panel, generation: u64) {
    debug!("Transition to {} armed for {:?}", target, router.delay());

    sleep(router.delay()).await;

    match router.commit(generation) {
        Ok(Some(state)) => info!("Panel transition complete, now showing {}", state.active),
        Ok(None) => debug!("Transition to {} was superseded", target),
        Err(e) => error!("Failed to complete panel transition: {}", e),
    }
}
