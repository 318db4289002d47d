//! Stream loading and fault watching background tasks

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    services::{StreamFault, StreamRequest},
    state::RadioPlayer,
};

/// Open one stream and hand the outcome back to the player
pub async fn stream_load_task(player: RadioPlayer, request: StreamRequest) {
    let generation = request.generation;
    let outcome = player.backend().open(request).await;

    match player.resolve(generation, outcome) {
        Ok(true) => debug!("Load attempt {} resolved", generation),
        Ok(false) => debug!("Load attempt {} was superseded", generation),
        Err(e) => error!("Failed to record load result: {}", e),
    }
}

/// Forward mid-play stream faults to the player until the channel closes
pub async fn stream_fault_task(player: RadioPlayer, mut faults: mpsc::UnboundedReceiver<StreamFault>) {
    info!("Starting stream fault watcher");

    while let Some(fault) = faults.recv().await {
        if let Err(e) = player.fault(fault) {
            error!("Failed to record stream fault: {}", e);
        }
    }

    debug!("Stream fault channel closed");
}
