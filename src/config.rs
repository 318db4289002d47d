//! Configuration, CLI argument handling and the station list

use std::{path::PathBuf, time::Duration};
use clap::Parser;
use serde::Deserialize;
use tracing::info;

use crate::{
    error::Result,
    state::{Station, StationList},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pitlane")]
#[command(about = "A state-managed HTTP server for the motocats site panels and radio")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Panel exit animation length in milliseconds
    #[arg(long, default_value = "300")]
    pub transition_ms: u64,

    /// YAML file with the station list (built-in list when omitted)
    #[arg(long)]
    pub stations: Option<PathBuf>,

    /// Initial radio volume between 0 and 1
    #[arg(long, default_value = "0.6")]
    pub volume: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Load the configured station list, falling back to the built-in one
    pub fn load_stations(&self) -> Result<StationList> {
        match &self.stations {
            Some(path) => {
                let stations = load_station_file(path)?;
                info!("Loaded {} stations from {}", stations.len(), path.display());
                Ok(stations)
            }
            None => default_stations(),
        }
    }
}

/// On-disk station list layout
#[derive(Debug, Deserialize)]
struct StationFile {
    stations: Vec<Station>,
}

/// Parse a station list from YAML text
pub fn parse_stations(yaml: &str) -> Result<StationList> {
    let file: StationFile = serde_yaml::from_str(yaml)?;
    StationList::new(file.stations)
}

/// Read and parse a YAML station list file
pub fn load_station_file(path: &std::path::Path) -> Result<StationList> {
    let yaml = std::fs::read_to_string(path)?;
    parse_stations(&yaml)
}

const DEFAULT_STATIONS: &[(&str, &str)] = &[
    ("DNB Radio", "https://dnbradio.nl/dnbradio_main.mp3"),
    ("Drumbase.Space", "https://radio.drumbase.space/radio/8000/mobile.mp3"),
    ("USA Dance Radio", "https://stream.rcast.net/66781"),
    ("San Francisco's 70s HITS", "https://a1.asurahosting.com:10990/radio.mp3"),
    ("RNB Radio", "https://streaming.silvacast.com/RNBRADIO.mp3"),
    ("Capital FM", "https://media-ice.musicradio.com/CapitalMP3"),
    ("80s Alive", "https://stream.80sa.live/80s-alive.mp3"),
    ("Smooth", "https://media-ice.musicradio.com/SmoothUKMP3"),
    ("1 Mix EDM", "https://fr2.1mix.co.uk:8060/stream/6/"),
    (
        "Island FM",
        "https://n05a-eu.rcs.revma.com/epatpyebanzuv?rj-ttl=5&rj-tok=AAABlWR1RR4AwW-xxUgdXWhZpg",
    ),
    ("Athens Party RNB", "https://ice.onestreaming.com/athenspartyrnb"),
    (
        "Hits Radio",
        "https://26343.live.streamtheworld.com/977_HITSAAC_SC?dist=onlineradiobox",
    ),
    ("TalkSPORT", "https://radio.talksport.com/stream"),
    ("Original 106", "https://listen-nation.sharp-stream.com/original106.mp3"),
    ("StarboxRNB", "https://stream.rcast.net/280259"),
    ("Liquid DNB", "https://free.rcast.net/283432"),
    ("Bedlam DnB", "https://free.rcast.net/255460"),
];

/// The station list the site ships with
pub fn default_stations() -> Result<StationList> {
    StationList::new(
        DEFAULT_STATIONS
            .iter()
            .map(|(name, url)| Station::new(*name, *url))
            .collect(),
    )
}
