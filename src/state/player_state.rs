//! Radio player state structure and station list

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, STREAM_ERROR_MESSAGE};

/// Volume restored by unmuting when no audible level was remembered
pub const DEFAULT_VOLUME: f32 = 0.6;

/// A named streaming audio endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub url: String,
}

impl Station {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Ordered, validated, immutable list of stations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StationList {
    stations: Vec<Station>,
}

impl StationList {
    /// Validate and wrap a station list.
    ///
    /// The list must be non-empty, every URL must be an absolute http(s) URL
    /// and no URL may appear twice (selection by URL has to be unambiguous).
    pub fn new(stations: Vec<Station>) -> Result<Self> {
        if stations.is_empty() {
            return Err(Error::EmptyStationList);
        }

        for (i, station) in stations.iter().enumerate() {
            let parsed = reqwest::Url::parse(&station.url).map_err(|e| Error::InvalidStationUrl {
                url: station.url.clone(),
                reason: e.to_string(),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::InvalidStationUrl {
                    url: station.url.clone(),
                    reason: format!("unsupported scheme {}", parsed.scheme()),
                });
            }
            if stations[..i].iter().any(|s| s.url == station.url) {
                return Err(Error::DuplicateStation(station.url.clone()));
            }
        }

        Ok(Self { stations })
    }

    /// Never zero, construction rejects empty lists
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn get(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn as_slice(&self) -> &[Station] {
        &self.stations
    }

    /// Position of the station streaming from `url`
    pub fn position_of_url(&self, url: &str) -> Option<usize> {
        self.stations.iter().position(|s| s.url == url)
    }

    /// Index after `index`, wrapping to the first station
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    /// Index before `index`, wrapping to the last station
    pub fn previous_index(&self, index: usize) -> usize {
        (index + self.len() - 1) % self.len()
    }
}

/// Playback status of the single stream source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerState {
    pub index: usize,
    pub playing: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub volume: f32,
    /// Level to come back to when unmuting
    #[serde(skip)]
    unmuted_volume: Option<f32>,
}

impl PlayerState {
    /// Create an idle player on the first station
    pub fn new(volume: f32) -> Self {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        Self {
            index: 0,
            playing: false,
            loading: false,
            error: None,
            volume,
            unmuted_volume: None,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.volume == 0.0
    }

    /// Set the volume, clamped to [0, 1]. Returns the applied level.
    pub fn set_volume(&mut self, volume: f32) -> Result<f32> {
        if volume.is_nan() {
            return Err(Error::InvalidVolume(volume));
        }
        self.volume = volume.clamp(0.0, 1.0);
        if self.volume > 0.0 {
            self.unmuted_volume = None;
        }
        Ok(self.volume)
    }

    /// Mute, or restore the level that was playing before the mute
    pub fn toggle_mute(&mut self) -> f32 {
        if self.is_muted() {
            self.volume = self.unmuted_volume.take().unwrap_or(DEFAULT_VOLUME);
        } else {
            self.unmuted_volume = Some(self.volume);
            self.volume = 0.0;
        }
        self.volume
    }

    /// A load attempt has started, previous source already stopped
    pub fn begin_load(&mut self) {
        self.playing = false;
        self.loading = true;
        self.error = None;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn mark_playing(&mut self) {
        self.playing = true;
        self.loading = false;
        self.error = None;
    }

    pub fn mark_failed(&mut self) {
        self.playing = false;
        self.loading = false;
        self.error = Some(STREAM_ERROR_MESSAGE.to_string());
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> StationList {
        StationList::new(vec![
            Station::new("A", "https://a.example/stream"),
            Station::new("B", "https://b.example/stream"),
            Station::new("C", "https://c.example/stream"),
        ])
        .unwrap()
    }

    #[test]
    fn next_wraps_around() {
        let list = abc();
        assert_eq!(list.next_index(0), 1);
        assert_eq!(list.next_index(1), 2);
        assert_eq!(list.next_index(2), 0);
    }

    #[test]
    fn previous_from_first_is_last() {
        assert_eq!(abc().previous_index(0), 2);
    }

    #[test]
    fn station_list_rejects_bad_input() {
        assert!(matches!(StationList::new(vec![]), Err(Error::EmptyStationList)));
        assert!(matches!(
            StationList::new(vec![Station::new("x", "not a url")]),
            Err(Error::InvalidStationUrl { .. })
        ));
        assert!(matches!(
            StationList::new(vec![Station::new("x", "ftp://x.example/a.mp3")]),
            Err(Error::InvalidStationUrl { .. })
        ));
        assert!(matches!(
            StationList::new(vec![
                Station::new("x", "https://x.example/a.mp3"),
                Station::new("y", "https://x.example/a.mp3"),
            ]),
            Err(Error::DuplicateStation(url)) if url == "https://x.example/a.mp3"
        ));
    }

    #[test]
    fn volume_is_clamped() {
        let mut state = PlayerState::default();
        assert_eq!(state.set_volume(-1.0).unwrap(), 0.0);
        assert_eq!(state.set_volume(2.0).unwrap(), 1.0);
        assert_eq!(state.set_volume(0.3).unwrap(), 0.3);
        assert!(matches!(state.set_volume(f32::NAN), Err(Error::InvalidVolume(_))));
        assert_eq!(state.volume, 0.3);
    }

    #[test]
    fn mute_twice_restores_level() {
        let mut state = PlayerState::new(0.3);
        assert_eq!(state.toggle_mute(), 0.0);
        assert!(state.is_muted());
        assert_eq!(state.toggle_mute(), 0.3);
    }

    #[test]
    fn unmute_without_memory_uses_default() {
        let mut state = PlayerState::new(0.0);
        assert_eq!(state.toggle_mute(), DEFAULT_VOLUME);
    }

    #[test]
    fn failure_then_success_clears_error() {
        let mut state = PlayerState::default();
        state.begin_load();
        state.mark_failed();
        assert!(!state.playing && !state.loading);
        assert_eq!(state.error.as_deref(), Some(STREAM_ERROR_MESSAGE));

        state.begin_load();
        assert!(state.loading && state.error.is_none());
        state.mark_playing();
        assert!(state.playing && !state.loading && state.error.is_none());
    }
}
