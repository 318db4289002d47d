//! Panel router: one visible overlay, animated switching

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use super::{Panel, PanelState, PanelStep, PanelView, StateEvent};
use crate::{
    error::{Error, Result},
    tasks::panel_transition_task,
};

/// Outcome of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub state: PanelState,
    /// False when the request left the router untouched
    pub changed: bool,
}

/// Tracks the visible panel and sequences exit/enter transitions.
///
/// Cloning is cheap and every clone drives the same state. Navigation
/// methods must be called from inside a tokio runtime because delayed
/// transitions run as spawned tasks.
#[derive(Debug, Clone)]
pub struct PanelRouter {
    inner: Arc<Mutex<RouterInner>>,
    delay: Duration,
    events: broadcast::Sender<StateEvent>,
}

#[derive(Debug, Default)]
struct RouterInner {
    state: PanelState,
    pending: Option<PendingTransition>,
    generation: u64,
}

/// A scheduled switch that has not fired yet
#[derive(Debug)]
struct PendingTransition {
    target: Panel,
    generation: u64,
    handle: JoinHandle<()>,
}

impl PanelRouter {
    pub fn new(delay: Duration, events: broadcast::Sender<StateEvent>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RouterInner::default())),
            delay,
            events,
        }
    }

    /// Delay between starting the exit animation and switching panels
    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn lock(&self) -> Result<MutexGuard<'_, RouterInner>> {
        self.inner.lock().map_err(|_| Error::StatePoisoned("panel"))
    }

    /// Current panel state
    pub fn state(&self) -> Result<PanelState> {
        Ok(self.lock()?.state)
    }

    /// Show `target`, animating out of the current panel if one is open
    pub fn open(&self, target: Panel) -> Result<Navigation> {
        let mut inner = self.lock()?;
        let pending = inner.pending.as_ref().map(|p| p.target);
        let step = inner.state.plan_open(pending, target);
        debug!("open({}) from {:?}: {:?}", target, inner.state, step);
        Ok(self.apply(&mut inner, step))
    }

    /// Animate out of the current panel back to the home view
    pub fn close(&self) -> Result<Navigation> {
        let mut inner = self.lock()?;
        let pending = inner.pending.as_ref().map(|p| p.target);
        let step = inner.state.plan_close(pending);
        debug!("close() from {:?}: {:?}", inner.state, step);
        Ok(self.apply(&mut inner, step))
    }

    fn apply(&self, inner: &mut RouterInner, step: PanelStep) -> Navigation {
        match step {
            PanelStep::Unchanged => {
                return Navigation {
                    state: inner.state,
                    changed: false,
                }
            }
            PanelStep::Show(panel) => {
                info!("Showing panel {}", panel);
                inner.state = PanelState {
                    active: panel,
                    closing: false,
                };
            }
            PanelStep::CancelPending => {
                Self::cancel_pending(inner);
                inner.state.closing = false;
            }
            PanelStep::Schedule(panel) => {
                Self::cancel_pending(inner);
                inner.generation += 1;
                inner.state.closing = true;

                let generation = inner.generation;
                let handle = tokio::spawn(panel_transition_task(self.clone(), panel, generation));
                inner.pending = Some(PendingTransition {
                    target: panel,
                    generation,
                    handle,
                });
                info!("Closing {} before switching to {}", inner.state.active, panel);
            }
        }

        self.notify(inner.state);
        Navigation {
            state: inner.state,
            changed: true,
        }
    }

    fn cancel_pending(inner: &mut RouterInner) {
        if let Some(pending) = inner.pending.take() {
            debug!("Cancelling transition to {} (generation {})", pending.target, pending.generation);
            pending.handle.abort();
        }
    }

    /// Finish the transition armed as `generation`.
    ///
    /// Returns `None` when that transition has been superseded in the meantime.
    pub(crate) fn commit(&self, generation: u64) -> Result<Option<PanelState>> {
        let mut inner = self.lock()?;
        let target = match &inner.pending {
            Some(pending) if pending.generation == generation => pending.target,
            _ => {
                debug!("Ignoring superseded transition (generation {})", generation);
                return Ok(None);
            }
        };

        // Dropping our own handle detaches it, the task is about to return anyway
        inner.pending = None;
        inner.state = PanelState {
            active: target,
            closing: false,
        };
        self.notify(inner.state);
        Ok(Some(inner.state))
    }

    fn notify(&self, state: PanelState) {
        // No receivers simply means nobody is listening yet
        if self.events.send(StateEvent::Panel(PanelView::from(state))).is_err() {
            debug!("No listeners for panel state change");
        }
    }

    /// Abort any armed transition, leaving the state as it is
    pub fn shutdown(&self) {
        match self.lock() {
            Ok(mut inner) => Self::cancel_pending(&mut inner),
            Err(e) => warn!("Failed to cancel panel transition: {}", e),
        }
    }
}
