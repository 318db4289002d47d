//! Stream playback backends

use std::{
    fmt,
    sync::{
        atomic::{AtomicU32, AtomicU64, Ordering},
        Arc,
    },
};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Report that a stream which had started playing stopped on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFault {
    pub generation: u64,
    pub reason: String,
}

/// Everything a backend needs to start one stream
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub url: String,
    pub volume: f32,
    /// Load attempt this request belongs to, echoed back in faults
    pub generation: u64,
    pub faults: mpsc::UnboundedSender<StreamFault>,
}

impl StreamRequest {
    /// Report a mid-play fault for this request
    pub fn report_fault(&self, reason: impl Into<String>) {
        let fault = StreamFault {
            generation: self.generation,
            reason: reason.into(),
        };
        if self.faults.send(fault).is_err() {
            debug!("Fault receiver closed, dropping fault for generation {}", self.generation);
        }
    }
}

/// A playing stream. Dropping the handle stops playback.
pub trait StreamHandle: Send + Sync + fmt::Debug {
    /// Apply a new volume in [0, 1]
    fn set_volume(&self, volume: f32);

    /// Bytes consumed from the source so far
    fn bytes_received(&self) -> u64;
}

/// Something that can turn a URL into a playing stream
#[async_trait]
pub trait StreamBackend: Send + Sync {
    /// Start playing `request.url`. Resolves once playback has started or failed.
    async fn open(&self, request: StreamRequest) -> Result<Box<dyn StreamHandle>>;
}

/// Backend that connects to HTTP(S) audio streams and consumes them
#[derive(Debug, Clone, Default)]
pub struct HttpStreamBackend {
    client: reqwest::Client,
}

impl HttpStreamBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Content types a browser audio element would accept for a radio stream
fn is_playable_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("audio/")
        || mime == "application/ogg"
        || mime == "application/octet-stream"
        || mime == "video/mp2t"
}

#[async_trait]
impl StreamBackend for HttpStreamBackend {
    async fn open(&self, request: StreamRequest) -> Result<Box<dyn StreamHandle>> {
        debug!("Connecting to stream {}", request.url);

        let response = self
            .client
            .get(&request.url)
            .send()
            .await
            .map_err(Error::stream_unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::stream_unavailable(format!("HTTP status {}", status)));
        }

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !is_playable_content_type(content_type) {
                return Err(Error::stream_unavailable(format!(
                    "unsupported content type {}",
                    content_type
                )));
            }
        }

        info!("Stream {} connected ({})", request.url, status);

        let bytes = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(consume_stream(response, Arc::clone(&bytes), request.clone()));

        Ok(Box::new(HttpStream {
            url: request.url,
            volume: AtomicU32::new(request.volume.to_bits()),
            bytes,
            task,
        }))
    }
}

/// Read the body until it ends, errors, or the task is aborted
async fn consume_stream(mut response: reqwest::Response, bytes: Arc<AtomicU64>, request: StreamRequest) {
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                bytes.fetch_add(chunk.len() as u64, Ordering::Relaxed);
            }
            Ok(None) => {
                warn!("Stream {} ended", request.url);
                request.report_fault("stream ended");
                break;
            }
            Err(e) => {
                warn!("Stream {} failed: {}", request.url, e);
                request.report_fault(e.to_string());
                break;
            }
        }
    }
}

/// Connected HTTP stream
pub struct HttpStream {
    url: String,
    volume: AtomicU32,
    bytes: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl HttpStream {
    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }
}

impl fmt::Debug for HttpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStream")
            .field("url", &self.url)
            .field("volume", &self.volume())
            .field("bytes_received", &self.bytes_received())
            .finish()
    }
}

impl StreamHandle for HttpStream {
    fn set_volume(&self, volume: f32) {
        self.volume.store(volume.to_bits(), Ordering::Relaxed);
    }

    fn bytes_received(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

impl Drop for HttpStream {
    fn drop(&mut self) {
        debug!("Stopping stream {}", self.url);
        self.task.abort();
    }
}
