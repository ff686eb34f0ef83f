use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub atlas: AtlasConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    pub token: String, // Bearer token for the history endpoint
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchConfig {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub latitude_between: [f64; 2],  // min,max degrees
    pub longitude_between: [f64; 2], // min,max degrees
    pub departure: String,           // IATA code
    pub arrival: String,             // IATA code
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AtlasConfig {
    pub path: String,
    pub snap_km: f64, // Points farther than this from any place resolve to no country
}

impl Config {
    /// Loads config.toml from the working directory.
    /// If it doesn't exist, creates a default one.
    pub fn load() -> Self {
        let config_path = "config.toml";

        if let Ok(content) = fs::read_to_string(config_path) {
            match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to parse config.toml: {}. Using defaults.", e),
            }
        }

        // Default configuration: the LHR -> CDG demo search. The token must
        // be filled in before the history endpoint will answer.
        let default_config = Config {
            api: ApiConfig {
                endpoint: "https://api.airsafe.spire.com/v2/targets/history".to_string(),
                token: String::new(),
            },
            search: SearchConfig {
                start: Utc.with_ymd_and_hms(2021, 4, 20, 12, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2021, 4, 20, 18, 30, 0).unwrap(),
                // Box around CDG airport
                latitude_between: [48.970752, 49.041694],
                longitude_between: [2.481443, 2.642431],
                departure: "LHR".to_string(),
                arrival: "CDG".to_string(),
            },
            atlas: AtlasConfig {
                path: "data/atlas.csv".to_string(),
                snap_km: 150.0,
            },
        };

        // Save default config to disk for the user to edit later
        let toml_string = toml::to_string_pretty(&default_config).unwrap();
        if fs::write(config_path, toml_string).is_err() {
            warn!("Could not write default config.toml to disk.");
        }

        info!("Loaded default configuration.");
        default_config
    }

    pub fn window(&self) -> crate::models::TimeWindow {
        crate::models::TimeWindow {
            start: self.search.start,
            end: self.search.end,
        }
    }

    pub fn bounding_box(&self) -> crate::models::BoundingBox {
        crate::models::BoundingBox {
            lat_min: self.search.latitude_between[0],
            lat_max: self.search.latitude_between[1],
            lon_min: self.search.longitude_between[0],
            lon_max: self.search.longitude_between[1],
        }
    }

    pub fn route(&self) -> crate::models::Route {
        crate::models::Route {
            departure: self.search.departure.clone(),
            arrival: self.search.arrival.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config {
            api: ApiConfig {
                endpoint: "https://example.test/history".to_string(),
                token: "secret".to_string(),
            },
            search: SearchConfig {
                start: Utc.with_ymd_and_hms(2021, 4, 20, 12, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2021, 4, 20, 18, 30, 0).unwrap(),
                latitude_between: [48.970752, 49.041694],
                longitude_between: [2.481443, 2.642431],
                departure: "LHR".to_string(),
                arrival: "CDG".to_string(),
            },
            atlas: AtlasConfig {
                path: "data/atlas.csv".to_string(),
                snap_km: 150.0,
            },
        };

        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed.api.endpoint, config.api.endpoint);
        assert_eq!(parsed.search.start, config.search.start);
        assert_eq!(parsed.search.latitude_between, config.search.latitude_between);
        assert_eq!(parsed.route().arrival, "CDG");
        assert_eq!(parsed.atlas.snap_km, 150.0);
    }

    #[test]
    fn accessors_carry_search_fields() {
        let config = Config {
            api: ApiConfig {
                endpoint: String::new(),
                token: String::new(),
            },
            search: SearchConfig {
                start: Utc.with_ymd_and_hms(2021, 4, 20, 12, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2021, 4, 20, 18, 30, 0).unwrap(),
                latitude_between: [48.970752, 49.041694],
                longitude_between: [2.481443, 2.642431],
                departure: "LHR".to_string(),
                arrival: "CDG".to_string(),
            },
            atlas: AtlasConfig {
                path: String::new(),
                snap_km: 150.0,
            },
        };

        let bbox = config.bounding_box();
        assert_eq!(bbox.latitude_between(), "48.970752,49.041694");
        let window = config.window();
        assert!(window.start < window.end);
    }
}
