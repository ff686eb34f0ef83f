//! Offline country lookup for path points.
//!
//! The resolver is a capability trait so the path logic can be exercised
//! without the bundled dataset; [`PlaceAtlas`] is the shipped
//! implementation, a nearest-place scan over a CSV of populated places.

use std::collections::HashSet;
use std::path::Path;

use color_eyre::Result;
use serde::Deserialize;
use tracing::{info, warn};

use crate::geo;
use crate::models::FlightPath;

/// Answers "which country is this coordinate in", or `None` when the point
/// cannot be placed (open ocean, dataset gap).
pub trait CountryResolver {
    fn country_at(&self, latitude: f64, longitude: f64) -> Option<String>;
}

/// A populated place and the ISO country code it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country: String,
}

/// Nearest-place reverse lookup over an in-memory place list.
///
/// A point resolves to the country of the closest place, unless that place
/// is farther away than the snap cutoff.
pub struct PlaceAtlas {
    places: Vec<Place>,
    snap_km: f64,
}

impl PlaceAtlas {
    pub fn new(places: Vec<Place>, snap_km: f64) -> Self {
        Self { places, snap_km }
    }

    /// Loads the dataset from a CSV file with
    /// `latitude,longitude,name,country` columns. Rows that fail to
    /// deserialize are logged and skipped.
    pub fn from_csv_path(path: &Path, snap_km: f64) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut places = Vec::new();
        for row in reader.deserialize::<Place>() {
            match row {
                Ok(place) => places.push(place),
                Err(e) => warn!("Skipping bad atlas row in '{}': {}", path.display(), e),
            }
        }
        info!("Loaded {} places from {}", places.len(), path.display());
        Ok(Self::new(places, snap_km))
    }
}

impl CountryResolver for PlaceAtlas {
    fn country_at(&self, latitude: f64, longitude: f64) -> Option<String> {
        let mut nearest: Option<(&Place, f64)> = None;
        for place in &self.places {
            let d = geo::great_circle_km(latitude, longitude, place.latitude, place.longitude);
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((place, d));
            }
        }
        nearest
            .filter(|(_, d)| *d <= self.snap_km)
            .map(|(place, _)| place.country.clone())
    }
}

/// Resolves every path point to a country code, in path order.
///
/// Points the resolver cannot place are skipped. The list is not
/// deduplicated; one entry per resolved point. Use [`distinct`] for display.
pub fn resolve_countries(resolver: &dyn CountryResolver, path: &FlightPath) -> Vec<String> {
    path.points
        .iter()
        .filter_map(|p| resolver.country_at(p.latitude, p.longitude))
        .collect()
}

/// Deduplicates country codes, keeping first-seen order.
pub fn distinct(codes: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    codes
        .iter()
        .filter(|code| seen.insert(code.as_str()))
        .cloned()
        .collect()
}
