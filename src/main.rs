use std::path::Path;

use color_eyre::Result;
use overflight::api::HistoryClient;
use overflight::atlas::{self, PlaceAtlas};
use overflight::config::Config;
use overflight::{flight, geo, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_logging();
    color_eyre::install()?;

    let config = Config::load();
    let window = config.window();
    let bbox = config.bounding_box();
    let route = config.route();

    let client = HistoryClient::new(&config.api.endpoint, &config.api.token);

    println!(
        "Searching for a {} -> {} flight between {} and {} ...",
        route.departure, route.arrival, window.start, window.end
    );
    info!(
        "Searching window {} - {} in box lat {} lon {}",
        window.start,
        window.end,
        bbox.latitude_between(),
        bbox.longitude_between()
    );

    let Some(target) = flight::locate_flight(&client, &window, &bbox, &route).await? else {
        println!(
            "No {} -> {} flight found in the search window.",
            route.departure, route.arrival
        );
        return Ok(());
    };

    println!("A flight has been found, loading flight path ...");
    println!(
        "Flight number: {}",
        target.flight_number.as_deref().unwrap_or("unknown")
    );
    println!(
        "Flight from/to: {}/{}",
        target.departure_airport_iata, target.arrival_airport_iata
    );
    println!(
        "Flight scheduled time: {} - {}",
        target.departure_scheduled_time, target.arrival_scheduled_time
    );

    let path = flight::assemble_path(&client, &target).await?;

    let (total_km, datapoints) = geo::path_distance_km(&path);
    println!("Datapoints found: {}", datapoints);
    if let (Some(first), Some(last)) = (path.earliest(), path.latest()) {
        println!("Earliest point found at: {}", first);
        println!("Latest point found at: {}", last);
    }

    let resolver = PlaceAtlas::from_csv_path(Path::new(&config.atlas.path), config.atlas.snap_km)?;
    let countries = atlas::resolve_countries(&resolver, &path);
    println!("Countries flown over: {:?}", atlas::distinct(&countries));

    println!("Total distance flown: {:.2} km", total_km);

    Ok(())
}
