//! TOML application configuration.

use crate::guidance::GuidanceConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use wayvox_foundation::AppError;
use wayvox_geo::Coordinate;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub destination: DestinationConfig,
    pub directions: DirectionsConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub guidance: GuidanceSection,
    #[serde(default)]
    pub walk: WalkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestinationConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl DestinationConfig {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsConfig {
    pub api_key: String,
    /// Override the directions endpoint (tests, proxies).
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// espeak voice identifier, e.g. "en" or "th".
    pub voice: Option<String>,
    pub rate_wpm: Option<u32>,
    pub translate: bool,
    pub source_lang: String,
    pub target_lang: String,
    pub translate_timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice: None,
            rate_wpm: None,
            translate: false,
            source_lang: "en".to_string(),
            target_lang: "th".to_string(),
            translate_timeout_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuidanceSection {
    pub proximity_threshold_m: f64,
    pub arrival_threshold_m: f64,
    pub off_route_dwell_secs: u64,
    pub fetch_retry_backoff_secs: u64,
    pub arrival_linger_secs: u64,
}

impl Default for GuidanceSection {
    fn default() -> Self {
        let defaults = GuidanceConfig::default();
        Self {
            proximity_threshold_m: defaults.proximity_threshold_m,
            arrival_threshold_m: defaults.arrival_threshold_m,
            off_route_dwell_secs: defaults.off_route_dwell.as_secs(),
            fetch_retry_backoff_secs: defaults.fetch_retry_backoff.as_secs(),
            arrival_linger_secs: defaults.arrival_linger.as_secs(),
        }
    }
}

impl From<&GuidanceSection> for GuidanceConfig {
    fn from(section: &GuidanceSection) -> Self {
        Self {
            proximity_threshold_m: section.proximity_threshold_m,
            arrival_threshold_m: section.arrival_threshold_m,
            off_route_dwell: Duration::from_secs(section.off_route_dwell_secs),
            fetch_retry_backoff: Duration::from_secs(section.fetch_retry_backoff_secs),
            arrival_linger: Duration::from_secs(section.arrival_linger_secs),
        }
    }
}

/// Scripted position source settings: `[lat, lng]` pairs replayed at a
/// fixed interval.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub interval_secs: u64,
    pub path: Vec<[f64; 2]>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            path: Vec::new(),
        }
    }
}

impl WalkConfig {
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.path
            .iter()
            .map(|[lat, lng]| Coordinate::new(*lat, *lng))
            .collect()
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: AppConfig = toml::from_str(&raw)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))?;

        if !config.destination.coordinate().is_valid() {
            return Err(AppError::Config(format!(
                "destination coordinate out of range: ({}, {})",
                config.destination.latitude, config.destination.longitude
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [destination]
        name = "Lumpini Park"
        latitude = 13.7308
        longitude = 100.5418

        [directions]
        api_key = "test-key"
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: AppConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.destination.name, "Lumpini Park");
        assert!(!config.speech.translate);
        assert_eq!(config.guidance.proximity_threshold_m, 20.0);
        assert_eq!(config.walk.interval_secs, 3);
        assert!(config.walk.path.is_empty());
    }

    #[test]
    fn guidance_section_converts_to_engine_config() {
        let section = GuidanceSection {
            off_route_dwell_secs: 120,
            ..Default::default()
        };
        let config = GuidanceConfig::from(&section);
        assert_eq!(config.off_route_dwell, Duration::from_secs(120));
        assert_eq!(config.proximity_threshold_m, 20.0);
    }

    #[test]
    fn walk_path_parses_into_coordinates() {
        let raw = format!(
            "{}\n[walk]\ninterval_secs = 2\npath = [[13.70, 100.50], [13.71, 100.51]]",
            MINIMAL
        );
        let config: AppConfig = toml::from_str(&raw).unwrap();
        let coords = config.walk.coordinates();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1], Coordinate::new(13.71, 100.51));
    }
}
