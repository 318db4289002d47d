//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{PanelView, PlayerSnapshot, SiteSnapshot};

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: SiteSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, snapshot: SiteSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            snapshot,
        }
    }

    /// Create a response for a request that was applied
    pub fn ok(message: String, snapshot: SiteSnapshot) -> Self {
        Self::new("ok".to_string(), message, snapshot)
    }

    /// Create a response for a request that changed nothing
    pub fn unchanged(message: String, snapshot: SiteSnapshot) -> Self {
        Self::new("unchanged".to_string(), message, snapshot)
    }
}

/// Full status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub panel: PanelView,
    pub player: PlayerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of POST /player/select
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectRequest {
    Index { index: usize },
    Url { url: String },
}

/// Body of POST /player/volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeRequest {
    pub volume: f32,
}

/// Query of GET /readouts/boost-sales
#[derive(Debug, Clone, Deserialize)]
pub struct BoostSalesQuery {
    pub sold: u64,
    pub total: u64,
}

/// Query of GET /readouts/speed
#[derive(Debug, Clone, Deserialize)]
pub struct SpeedQuery {
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub units: Option<String>,
}
