use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use standby_planner::domain::{Airport, Connection, Destination, IataCode, format_duration};
use standby_planner::geo::AirportLocations;
use standby_planner::planner::{ConnectionQuery, Planner, ReturnQuery, SearchConfig};
use standby_planner::snapshot::{load_flights, load_locations};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON snapshot of published flights
    #[arg(long, env = "STANDBY_FLIGHTS")]
    flights: PathBuf,

    /// JSON table of airport locations; without it no airports count as nearby
    #[arg(long, env = "STANDBY_LOCATIONS")]
    locations: Option<PathBuf>,

    /// Maximum intermediate stops per itinerary
    #[arg(long, default_value_t = SearchConfig::default().max_stops)]
    max_stops: usize,

    /// Radius (km) within which airports are interchangeable
    #[arg(long, default_value_t = SearchConfig::default().radius_km)]
    radius_km: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One-way itineraries, earliest arrival first
    Connections {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Earliest departure date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Print one line per itinerary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Out-and-back trips from home airports within a date window
    Returns {
        /// Comma-separated home airport codes
        #[arg(long)]
        home: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Print one line per trip instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// List every airport the snapshot serves
    Airports,
    /// Served airports within the radius of an airport
    Nearby { code: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NearbyAirport {
    airport: Airport,
    distance_km: Option<f64>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "standby_planner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let catalog = load_flights(&cli.flights)?;
    let locations = match &cli.locations {
        Some(path) => load_locations(path)?,
        None => AirportLocations::new(),
    };
    info!(
        flights = catalog.len(),
        airports = catalog.airports().len(),
        locations = locations.len(),
        "Loaded snapshot"
    );

    let config = SearchConfig {
        max_stops: cli.max_stops,
        radius_km: cli.radius_km,
        ..SearchConfig::default()
    };
    let planner = Planner::new(&catalog, &locations, &config);

    match &cli.command {
        Commands::Connections {
            from,
            to,
            date,
            summary,
        } => {
            let query = ConnectionQuery::parse(from, to, date)?;
            let result = planner.search(&query)?;
            if result.truncated {
                eprintln!("Search stopped early; results are incomplete.");
            }

            if *summary {
                for connection in &result.connections {
                    println!("{}", describe(connection));
                }
            } else {
                print_json(&result.connections)?;
            }
        }
        Commands::Returns {
            home,
            start,
            end,
            summary,
        } => {
            let query = ReturnQuery::parse(home, start, end)?;
            let destinations = planner.return_journeys(&query)?;

            if *summary {
                print_destinations(&destinations);
            } else {
                print_json(&destinations)?;
            }
        }
        Commands::Airports => {
            print_json(&catalog.airports())?;
        }
        Commands::Nearby { code } => {
            let code = IataCode::parse_normalized(code)
                .with_context(|| format!("invalid airport code {code:?}"))?;
            let nearby: Vec<NearbyAirport> = planner
                .geo_index()
                .nearby_airports(&code)
                .into_iter()
                .map(|airport| NearbyAirport {
                    distance_km: locations.distance_km(&code, &airport.code),
                    airport,
                })
                .collect();
            print_json(&nearby)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// One line per itinerary, e.g.
/// `AUH (Abu Dhabi) 2024-03-15 10:00 -> ALA (Almaty) 2024-03-15 16:00, direct, 6h 0m`.
fn describe(connection: &Connection) -> String {
    let stops = match connection.stop_count() {
        0 => "direct".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{n} stops"),
    };
    let mut line = format!(
        "{} {} -> {} {}, {stops}, {}",
        connection.origin(),
        connection.departure_time().format("%Y-%m-%d %H:%M"),
        connection.destination(),
        connection.arrival_time().format("%Y-%m-%d %H:%M"),
        format_duration(connection.total_duration_minutes()),
    );
    if let Some((amount, currency)) = connection.total_price() {
        line.push_str(&format!(", {amount:.2}{currency}"));
    }
    if connection.has_airport_change_layover() {
        line.push_str(", changes airport");
    }
    line
}

fn print_destinations(destinations: &[Destination]) {
    for destination in destinations {
        println!("{}", destination.airport);
        for connection in &destination.connections {
            println!("  {}", describe(connection));
        }
    }
}
