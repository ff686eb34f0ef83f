//! Locating a flight in the history stream and assembling its path.

use color_eyre::Result;
use tracing::info;

use crate::api::FlightDataSource;
use crate::models::{
    parse_target_lines, BoundingBox, FlightPath, FlightTarget, PositionReport, Route, TimeWindow,
};

/// Scans target updates in the window and box for the first one flying the
/// requested route.
///
/// Records matching the route but missing identifying fields are skipped
/// like any other malformed record. `Ok(None)` means nothing matched, which
/// callers treat as a normal outcome.
pub async fn locate_flight(
    source: &dyn FlightDataSource,
    window: &TimeWindow,
    bbox: &BoundingBox,
    route: &Route,
) -> Result<Option<FlightTarget>> {
    let body = source.search_area(window, bbox).await?;
    let updates = parse_target_lines(&body);
    info!(
        "Scanned {} target updates for a {} -> {} flight",
        updates.len(),
        route.departure,
        route.arrival
    );

    Ok(updates
        .into_iter()
        .filter(|update| route.matches(update))
        .find_map(FlightTarget::from_update))
}

/// Fetches every position report for the target's transponder within its
/// scheduled window, in the order the data source delivers them.
///
/// Zero reports yield a valid empty path.
pub async fn assemble_path(
    source: &dyn FlightDataSource,
    target: &FlightTarget,
) -> Result<FlightPath> {
    let body = source
        .icao_history(&target.icao_address, &target.schedule())
        .await?;
    let points: Vec<PositionReport> = parse_target_lines(&body)
        .into_iter()
        .filter_map(PositionReport::from_update)
        .collect();
    info!(
        "Assembled {} position reports for {}",
        points.len(),
        target.icao_address
    );

    Ok(FlightPath { points })
}
