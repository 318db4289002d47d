//! Radio player: one stream at a time from a fixed station list

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{PlayerSnapshot, PlayerState, StateEvent, StationList};
use crate::{
    error::{Error, Result},
    services::{StreamBackend, StreamFault, StreamHandle, StreamRequest},
    tasks::stream_load_task,
};

/// Outcome of a station selection
#[derive(Debug, Clone)]
pub struct Selection {
    pub snapshot: PlayerSnapshot,
    /// False when the station was already selected
    pub changed: bool,
}

/// Owns the playback source and the player state.
///
/// Cloning is cheap and every clone drives the same player. Methods that
/// start playback spawn the load on the current tokio runtime.
#[derive(Clone)]
pub struct RadioPlayer {
    inner: Arc<Mutex<PlayerInner>>,
    stations: Arc<StationList>,
    backend: Arc<dyn StreamBackend>,
    faults: mpsc::UnboundedSender<StreamFault>,
    events: broadcast::Sender<StateEvent>,
}

struct PlayerInner {
    state: PlayerState,
    /// Id of the latest load attempt; older resolutions are ignored
    generation: u64,
    source: Option<Box<dyn StreamHandle>>,
    loading: Option<JoinHandle<()>>,
}

impl RadioPlayer {
    /// Create an idle player on the first station. Call [`RadioPlayer::start`]
    /// to begin playing it.
    ///
    /// The returned receiver carries mid-play faults from the backend and has
    /// to be drained with [`crate::tasks::stream_fault_task`].
    pub fn new(
        stations: StationList,
        backend: Arc<dyn StreamBackend>,
        volume: f32,
        events: broadcast::Sender<StateEvent>,
    ) -> (Self, mpsc::UnboundedReceiver<StreamFault>) {
        let (faults, fault_rx) = mpsc::unbounded_channel();
        let player = Self {
            inner: Arc::new(Mutex::new(PlayerInner {
                state: PlayerState::new(volume),
                generation: 0,
                source: None,
                loading: None,
            })),
            stations: Arc::new(stations),
            backend,
            faults,
            events,
        };
        (player, fault_rx)
    }

    fn lock(&self) -> Result<MutexGuard<'_, PlayerInner>> {
        self.inner.lock().map_err(|_| Error::StatePoisoned("player"))
    }

    pub fn stations(&self) -> &StationList {
        &self.stations
    }

    pub(crate) fn backend(&self) -> Arc<dyn StreamBackend> {
        Arc::clone(&self.backend)
    }

    /// Current player state as published to clients
    pub fn snapshot(&self) -> Result<PlayerSnapshot> {
        let inner = self.lock()?;
        Ok(self.snapshot_of(&inner))
    }

    fn snapshot_of(&self, inner: &PlayerInner) -> PlayerSnapshot {
        let state = &inner.state;
        // Index is always in range, the list is non-empty and never changes
        let station = self.stations.as_slice()[state.index].clone();
        PlayerSnapshot {
            station,
            index: state.index,
            station_count: self.stations.len(),
            playing: state.playing,
            loading: state.loading,
            error: state.error.clone(),
            volume: state.volume,
            muted: state.is_muted(),
            bytes_received: inner.source.as_ref().map_or(0, |s| s.bytes_received()),
        }
    }

    fn publish(&self, inner: &PlayerInner) -> PlayerSnapshot {
        let snapshot = self.snapshot_of(inner);
        if self.events.send(StateEvent::Player(snapshot.clone())).is_err() {
            debug!("No listeners for player state change");
        }
        snapshot
    }

    /// Autoplay the current station, as the site does on first load
    pub fn start(&self) -> Result<PlayerSnapshot> {
        let mut inner = self.lock()?;
        info!("Autoplaying {}", self.stations.as_slice()[inner.state.index].name);
        self.start_load(&mut inner);
        Ok(self.publish(&inner))
    }

    /// Switch to the next station, wrapping to the first
    pub fn next(&self) -> Result<PlayerSnapshot> {
        let mut inner = self.lock()?;
        let index = self.stations.next_index(inner.state.index);
        Ok(self.switch_to(&mut inner, index).snapshot)
    }

    /// Switch to the previous station, wrapping to the last
    pub fn previous(&self) -> Result<PlayerSnapshot> {
        let mut inner = self.lock()?;
        let index = self.stations.previous_index(inner.state.index);
        Ok(self.switch_to(&mut inner, index).snapshot)
    }

    /// Switch to the station at `index`
    pub fn select(&self, index: usize) -> Result<Selection> {
        if index >= self.stations.len() {
            return Err(Error::StationNotFound(format!("index {}", index)));
        }
        let mut inner = self.lock()?;
        Ok(self.switch_to(&mut inner, index))
    }

    /// Switch to the station streaming from `url`
    pub fn select_url(&self, url: &str) -> Result<Selection> {
        let index = self
            .stations
            .position_of_url(url)
            .ok_or_else(|| Error::StationNotFound(url.to_string()))?;
        let mut inner = self.lock()?;
        Ok(self.switch_to(&mut inner, index))
    }

    fn switch_to(&self, inner: &mut PlayerInner, index: usize) -> Selection {
        if index == inner.state.index {
            debug!("Station {} already selected", index);
            return Selection {
                snapshot: self.snapshot_of(inner),
                changed: false,
            };
        }
        inner.state.index = index;
        info!("Tuning to {}", self.stations.as_slice()[index].name);
        self.start_load(inner);
        Selection {
            snapshot: self.publish(inner),
            changed: true,
        }
    }

    /// Stop whatever is playing and start loading the current station
    fn start_load(&self, inner: &mut PlayerInner) {
        if let Some(task) = inner.loading.take() {
            task.abort();
        }
        inner.source = None;
        inner.generation += 1;
        inner.state.begin_load();

        let request = StreamRequest {
            url: self.stations.as_slice()[inner.state.index].url.clone(),
            volume: inner.state.volume,
            generation: inner.generation,
            faults: self.faults.clone(),
        };
        debug!("Loading {} (generation {})", request.url, request.generation);
        inner.loading = Some(tokio::spawn(stream_load_task(self.clone(), request)));
    }

    /// Pause if playing, otherwise try to play the current station again
    pub fn toggle_playback(&self) -> Result<PlayerSnapshot> {
        let mut inner = self.lock()?;
        if inner.state.playing {
            info!("Pausing playback");
            inner.source = None;
            inner.state.stop();
        } else {
            info!("Starting playback");
            self.start_load(&mut inner);
        }
        Ok(self.publish(&inner))
    }

    /// Set the volume, clamped to [0, 1], and apply it to the active stream
    pub fn set_volume(&self, volume: f32) -> Result<PlayerSnapshot> {
        let mut inner = self.lock()?;
        let applied = inner.state.set_volume(volume)?;
        if let Some(source) = &inner.source {
            source.set_volume(applied);
        }
        debug!("Volume set to {}", applied);
        Ok(self.publish(&inner))
    }

    /// Mute, or restore the level from before the mute
    pub fn toggle_mute(&self) -> Result<PlayerSnapshot> {
        let mut inner = self.lock()?;
        let applied = inner.state.toggle_mute();
        if let Some(source) = &inner.source {
            source.set_volume(applied);
        }
        debug!("Mute toggled, volume now {}", applied);
        Ok(self.publish(&inner))
    }

    /// Record the outcome of load attempt `generation`.
    ///
    /// Returns false when a newer attempt has superseded this one; a stale
    /// stream that did start is stopped right away.
    pub(crate) fn resolve(
        &self,
        generation: u64,
        outcome: Result<Box<dyn StreamHandle>>,
    ) -> Result<bool> {
        let mut inner = self.lock()?;
        if generation != inner.generation {
            debug!(
                "Discarding stale load result (generation {}, current {})",
                generation, inner.generation
            );
            return Ok(false);
        }

        inner.loading = None;
        match outcome {
            Ok(source) => {
                // Volume may have moved while the stream was connecting
                source.set_volume(inner.state.volume);
                inner.source = Some(source);
                inner.state.mark_playing();
                info!("Playing {}", self.stations.as_slice()[inner.state.index].name);
            }
            Err(e) => {
                match &e {
                    Error::StreamUnavailable { reason } => warn!("Stream unavailable: {}", reason),
                    other => warn!("Stream failed to start: {}", other),
                }
                inner.source = None;
                inner.state.mark_failed();
            }
        }
        self.publish(&inner);
        Ok(true)
    }

    /// Handle a stream that stopped on its own after starting
    pub(crate) fn fault(&self, fault: StreamFault) -> Result<bool> {
        let mut inner = self.lock()?;
        if fault.generation != inner.generation || inner.source.is_none() {
            debug!("Ignoring fault from generation {}", fault.generation);
            return Ok(false);
        }

        warn!("Active stream faulted: {}", fault.reason);
        inner.source = None;
        inner.state.mark_failed();
        self.publish(&inner);
        Ok(true)
    }

    /// Stop playback and abandon any pending load
    pub fn shutdown(&self) {
        match self.lock() {
            Ok(mut inner) => {
                if let Some(task) = inner.loading.take() {
                    task.abort();
                }
                inner.source = None;
                inner.state.stop();
                inner.state.loading = false;
            }
            Err(e) => warn!("Failed to stop player: {}", e),
        }
    }
}
