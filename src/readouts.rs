//! Readouts shown on the panels: boost sale progress and the speed gauge

use serde::{Deserialize, Serialize};

/// Progress of the global boost sale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostSales {
    pub sold: u64,
    pub total: u64,
    /// Share sold, in [0, 100]
    pub percent: f64,
    /// Percent rounded for the "N% sold out" label
    pub rounded: u64,
}

impl BoostSales {
    pub fn new(sold: u64, total: u64) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            (sold as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };
        Self {
            sold,
            total,
            percent,
            rounded: percent.round() as u64,
        }
    }
}

/// Gauge geometry in SVG user units
pub const GAUGE_CENTER: (f64, f64) = (140.0, 160.0);
pub const GAUGE_RADIUS: f64 = 120.0;
/// Needle length relative to the arc radius
pub const NEEDLE_RATIO: f64 = 0.68;

pub const DEFAULT_GAUGE_MIN: f64 = 0.0;
pub const DEFAULT_GAUGE_MAX: f64 = 200.0;
pub const DEFAULT_GAUGE_UNITS: &str = "MP/H";

/// Semicircular speed gauge sweeping from 180° (left) to 360° (right)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedGauge {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub units: String,
    /// Value clamped to [min, max]
    pub clamped: f64,
    /// Position along the arc in [0, 1]
    pub fraction: f64,
    pub needle_deg: f64,
    /// Needle tip in SVG coordinates
    pub needle_tip: (f64, f64),
    /// Rounded value for the label
    pub display: String,
}

impl SpeedGauge {
    pub fn new(value: f64, min: f64, max: f64, units: impl Into<String>) -> Self {
        // An inverted range pins the needle at min
        let clamped = min.max(max.min(value));
        let fraction = (clamped - min) / (max - min).max(1.0);
        let needle_deg = 180.0 + 180.0 * fraction;

        let rad = needle_deg.to_radians();
        let length = GAUGE_RADIUS * NEEDLE_RATIO;
        let needle_tip = (
            GAUGE_CENTER.0 + length * rad.cos(),
            GAUGE_CENTER.1 + length * rad.sin(),
        );

        Self {
            value,
            min,
            max,
            units: units.into(),
            clamped,
            fraction,
            needle_deg,
            needle_tip,
            display: format!("{}", clamped.round()),
        }
    }

    /// Gauge with the site's default 0-200 MP/H scale
    pub fn mph(value: f64) -> Self {
        Self::new(value, DEFAULT_GAUGE_MIN, DEFAULT_GAUGE_MAX, DEFAULT_GAUGE_UNITS)
    }
}
