use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

// One line of the newline-delimited history response. The stream interleaves
// target updates with other record kinds that carry no `target` object.
#[derive(Debug, Deserialize)]
struct HistoryLine {
    target: Option<TargetUpdate>,
}

/// A raw target update as delivered by the history endpoint.
///
/// Every field is optional at this layer; validation happens when a record
/// is promoted to a [`FlightTarget`] or [`PositionReport`].
#[derive(Debug, Clone, Deserialize)]
pub struct TargetUpdate {
    pub icao_address: Option<String>,
    pub flight_number: Option<String>,
    pub departure_airport_iata: Option<String>,
    pub arrival_airport_iata: Option<String>,
    pub departure_scheduled_time: Option<DateTime<Utc>>,
    pub arrival_scheduled_time: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Identifies one flight instance: the transponder to follow and the
/// scheduled window to follow it in.
#[derive(Debug, Clone)]
pub struct FlightTarget {
    pub icao_address: String,
    pub flight_number: Option<String>,
    pub departure_airport_iata: String,
    pub arrival_airport_iata: String,
    pub departure_scheduled_time: DateTime<Utc>,
    pub arrival_scheduled_time: DateTime<Utc>,
}

impl FlightTarget {
    /// Promotes a raw update to a flight identity. `None` when the record
    /// lacks a field needed to fetch its path.
    pub fn from_update(update: TargetUpdate) -> Option<Self> {
        Some(Self {
            icao_address: update.icao_address?,
            flight_number: update.flight_number,
            departure_airport_iata: update.departure_airport_iata?,
            arrival_airport_iata: update.arrival_airport_iata?,
            departure_scheduled_time: update.departure_scheduled_time?,
            arrival_scheduled_time: update.arrival_scheduled_time?,
        })
    }

    pub fn schedule(&self) -> TimeWindow {
        TimeWindow {
            start: self.departure_scheduled_time,
            end: self.arrival_scheduled_time,
        }
    }
}

/// A single position report. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl PositionReport {
    pub fn from_update(update: TargetUpdate) -> Option<Self> {
        Some(Self {
            latitude: update.latitude?,
            longitude: update.longitude?,
            timestamp: update.timestamp,
        })
    }
}

/// Position reports in the order the data source delivered them. Duplicate
/// or out-of-order points are kept as-is; nothing re-sorts the sequence.
#[derive(Debug, Clone, Default)]
pub struct FlightPath {
    pub points: Vec<PositionReport>,
}

impl FlightPath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn earliest(&self) -> Option<DateTime<Utc>> {
        self.points.first().and_then(|p| p.timestamp)
    }

    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.points.last().and_then(|p| p.timestamp)
    }
}

/// The departure/arrival airport pair being searched for.
#[derive(Debug, Clone)]
pub struct Route {
    pub departure: String,
    pub arrival: String,
}

impl Route {
    /// Exact IATA match on both ends of the route.
    pub fn matches(&self, update: &TargetUpdate) -> bool {
        update.departure_airport_iata.as_deref() == Some(self.departure.as_str())
            && update.arrival_airport_iata.as_deref() == Some(self.arrival.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Geographic search box, degrees.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// `min,max` as the history endpoint expects it.
    pub fn latitude_between(&self) -> String {
        format!("{},{}", self.lat_min, self.lat_max)
    }

    pub fn longitude_between(&self) -> String {
        format!("{},{}", self.lon_min, self.lon_max)
    }
}

/// Splits a newline-delimited history response into target updates.
///
/// Lines that are not valid JSON, or that carry no nested `target`, are
/// dropped without failing the scan.
pub fn parse_target_lines(body: &str) -> Vec<TargetUpdate> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<HistoryLine>(line) {
            Ok(parsed) => parsed.target,
            Err(e) => {
                debug!("Skipping unparseable history line: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_bad_lines_and_keeps_targets() {
        let body = concat!(
            r#"{"target":{"icao_address":"400F99","latitude":49.1,"longitude":2.4}}"#,
            "\n",
            "this is not json\n",
            r#"{"status":"connected"}"#,
            "\n",
            "\n",
            r#"{"target":{"icao_address":"3C6589","latitude":50.0,"longitude":1.2}}"#,
            "\n",
        );

        let updates = parse_target_lines(body);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].icao_address.as_deref(), Some("400F99"));
        assert_eq!(updates[1].icao_address.as_deref(), Some("3C6589"));
    }

    #[test]
    fn parse_of_empty_body_is_empty() {
        assert!(parse_target_lines("").is_empty());
    }

    #[test]
    fn flight_target_requires_identifying_fields() {
        let body = r#"{"target":{"icao_address":"400F99","departure_airport_iata":"LHR","arrival_airport_iata":"CDG"}}"#;
        let update = parse_target_lines(body).remove(0);
        // No scheduled times, so this record cannot identify a flight.
        assert!(FlightTarget::from_update(update).is_none());
    }

    #[test]
    fn flight_target_from_complete_update() {
        let body = concat!(
            r#"{"target":{"icao_address":"400F99","flight_number":"BA308","#,
            r#""departure_airport_iata":"LHR","arrival_airport_iata":"CDG","#,
            r#""departure_scheduled_time":"2021-04-20T14:20:00Z","#,
            r#""arrival_scheduled_time":"2021-04-20T15:40:00Z","#,
            r#""latitude":48.99,"longitude":2.55,"timestamp":"2021-04-20T15:32:11Z"}}"#
        );
        let update = parse_target_lines(body).remove(0);
        let target = FlightTarget::from_update(update).unwrap();
        assert_eq!(target.icao_address, "400F99");
        assert_eq!(target.flight_number.as_deref(), Some("BA308"));
        let window = target.schedule();
        assert!(window.start < window.end);
    }

    #[test]
    fn position_report_requires_coordinates() {
        let body = r#"{"target":{"icao_address":"400F99"}}"#;
        let update = parse_target_lines(body).remove(0);
        assert!(PositionReport::from_update(update).is_none());
    }

    #[test]
    fn route_match_is_exact() {
        let body = r#"{"target":{"departure_airport_iata":"LHR","arrival_airport_iata":"CDG"}}"#;
        let update = parse_target_lines(body).remove(0);

        let route = Route {
            departure: "LHR".to_string(),
            arrival: "CDG".to_string(),
        };
        assert!(route.matches(&update));

        let other = Route {
            departure: "LHR".to_string(),
            arrival: "ORY".to_string(),
        };
        assert!(!other.matches(&update));
    }

    #[test]
    fn bounding_box_renders_min_max_pairs() {
        let bbox = BoundingBox {
            lat_min: 48.970752,
            lat_max: 49.041694,
            lon_min: 2.481443,
            lon_max: 2.642431,
        };
        assert_eq!(bbox.latitude_between(), "48.970752,49.041694");
        assert_eq!(bbox.longitude_between(), "2.481443,2.642431");
    }
}
