//! Shared test helpers: a scripted stream backend and app builders
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use async_trait::async_trait;
use pitlane::{
    services::{StreamBackend, StreamHandle, StreamRequest},
    state::{AppState, PlayerSnapshot, RadioPlayer, Station, StationList},
    tasks::stream_fault_task,
    Error, Result,
};
use tokio::sync::{broadcast, Notify};

pub const URL_A: &str = "https://a.example/stream.mp3";
pub const URL_B: &str = "https://b.example/stream.mp3";
pub const URL_C: &str = "https://c.example/stream.mp3";

/// Stations A, B, C
pub fn stations_abc() -> StationList {
    StationList::new(vec![
        Station::new("A", URL_A),
        Station::new("B", URL_B),
        Station::new("C", URL_C),
    ])
    .unwrap()
}

#[derive(Default)]
struct Script {
    failing: HashSet<String>,
    held: HashMap<String, Arc<Notify>>,
    opened: Vec<String>,
    requests: HashMap<String, StreamRequest>,
    last_volume: Option<f32>,
}

/// In-memory backend whose outcomes are set by the test
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
    live: Arc<AtomicUsize>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future open of `url` fail
    pub fn fail(&self, url: &str) {
        self.script.lock().unwrap().failing.insert(url.to_string());
    }

    pub fn clear_failures(&self) {
        self.script.lock().unwrap().failing.clear();
    }

    /// Make opens of `url` wait until the returned notify is triggered
    pub fn hold(&self, url: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.script
            .lock()
            .unwrap()
            .held
            .insert(url.to_string(), Arc::clone(&notify));
        notify
    }

    /// URLs opened so far, in order
    pub fn opened(&self) -> Vec<String> {
        self.script.lock().unwrap().opened.clone()
    }

    /// Number of stream handles currently alive
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Last volume applied to any handle
    pub fn last_volume(&self) -> Option<f32> {
        self.script.lock().unwrap().last_volume
    }

    /// Report a mid-play fault for the most recent open of `url`
    pub fn fault(&self, url: &str, reason: &str) {
        let request = self.script.lock().unwrap().requests.get(url).cloned();
        request.expect("stream was never opened").report_fault(reason);
    }
}

#[async_trait]
impl StreamBackend for ScriptedBackend {
    async fn open(&self, request: StreamRequest) -> Result<Box<dyn StreamHandle>> {
        let held = {
            let mut script = self.script.lock().unwrap();
            script.opened.push(request.url.clone());
            script.requests.insert(request.url.clone(), request.clone());
            script.held.get(&request.url).cloned()
        };

        if let Some(notify) = held {
            notify.notified().await;
        }

        let failing = self.script.lock().unwrap().failing.contains(&request.url);
        if failing {
            return Err(Error::stream_unavailable("scripted failure"));
        }

        self.live.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().last_volume = Some(request.volume);
        Ok(Box::new(ScriptedStream {
            url: request.url,
            script: Arc::clone(&self.script),
            live: Arc::clone(&self.live),
        }))
    }
}

pub struct ScriptedStream {
    url: String,
    script: Arc<Mutex<Script>>,
    live: Arc<AtomicUsize>,
}

impl std::fmt::Debug for ScriptedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedStream").field("url", &self.url).finish()
    }
}

impl StreamHandle for ScriptedStream {
    fn set_volume(&self, volume: f32) {
        self.script.lock().unwrap().last_volume = Some(volume);
    }

    fn bytes_received(&self) -> u64 {
        4096
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Player on stations A, B, C with its fault watcher running
pub fn spawn_player(backend: &ScriptedBackend) -> RadioPlayer {
    let (events, _) = broadcast::channel(64);
    let (player, faults) = RadioPlayer::new(stations_abc(), Arc::new(backend.clone()), 0.6, events);
    tokio::spawn(stream_fault_task(player.clone(), faults));
    player
}

/// Full site state on stations A, B, C with a 300 ms transition
pub fn spawn_app(backend: &ScriptedBackend) -> Arc<AppState> {
    let (state, faults) = AppState::new(
        0,
        "127.0.0.1".to_string(),
        Duration::from_millis(300),
        0.6,
        stations_abc(),
        Arc::new(backend.clone()),
    );
    let state = Arc::new(state);
    tokio::spawn(stream_fault_task(state.player.clone(), faults));
    state
}

/// Poll the player until `done` holds, panicking after a virtual second
pub async fn wait_for(player: &RadioPlayer, done: impl Fn(&PlayerSnapshot) -> bool) -> PlayerSnapshot {
    for _ in 0..1000 {
        let snapshot = player.snapshot().unwrap();
        if done(&snapshot) {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("player never reached the expected state: {:?}", player.snapshot().unwrap());
}

/// Let spawned tasks run without advancing far in time
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(1)).await;
}
