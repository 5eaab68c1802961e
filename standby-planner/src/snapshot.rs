//! JSON snapshot files for the command-line front-end.
//!
//! A flight snapshot is a JSON array of flights in the same camelCase shape
//! that search results use. A location snapshot is a JSON array of
//! `{ "iata", "latitude", "longitude" }` records with string coordinates.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::FlightCatalog;
use crate::domain::Flight;
use crate::geo::{AirportLocationRecord, AirportLocations};

/// Errors from reading a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File is not the expected JSON
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a flight catalog from a JSON snapshot, keeping file order.
pub fn load_flights(path: impl AsRef<Path>) -> Result<FlightCatalog, SnapshotError> {
    let path = path.as_ref();
    let flights: Vec<Flight> = read_json(path)?;
    debug!(path = %path.display(), flights = flights.len(), "Loaded flight snapshot");
    Ok(FlightCatalog::new(flights))
}

/// Load the airport location table from a JSON snapshot.
///
/// Rows that don't parse are skipped, as with any other location source.
pub fn load_locations(path: impl AsRef<Path>) -> Result<AirportLocations, SnapshotError> {
    let records: Vec<AirportLocationRecord> = read_json(path.as_ref())?;
    Ok(AirportLocations::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IataCode;
    use tempfile::tempdir;

    fn code(s: &str) -> IataCode {
        IataCode::parse(s).unwrap()
    }

    const FLIGHTS: &str = r#"[
        {
            "departure": "2024-03-15T10:00:00",
            "arrival": "2024-03-15T11:00:00",
            "durationMinutes": 60,
            "from": { "code": "AUH", "name": "Abu Dhabi" },
            "to": { "code": "MCT", "name": "Muscat" },
            "price": { "amount": 199.5, "currency": "AED" }
        },
        {
            "departure": "2024-03-15T12:30:00",
            "arrival": "2024-03-15T16:00:00",
            "durationMinutes": 210,
            "from": { "code": "MCT", "name": "Muscat" },
            "to": { "code": "ALA", "name": "Almaty" },
            "price": { "amount": 349.0, "currency": "AED" }
        }
    ]"#;

    #[test]
    fn load_flight_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.json");
        std::fs::write(&path, FLIGHTS).unwrap();

        let catalog = load_flights(&path).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.flights()[0].from.code, code("AUH"));
        assert_eq!(catalog.flights()[1].duration_minutes, 210);
        assert_eq!(
            catalog.flights()[0].price.amount,
            rust_decimal::Decimal::new(1995, 1)
        );
        assert_eq!(catalog.airport(&code("ALA")).unwrap().name, "Almaty");
    }

    #[test]
    fn load_location_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        std::fs::write(
            &path,
            r#"[
                { "iata": "DXB", "latitude": "25.2528", "longitude": "55.3644" },
                { "iata": "", "latitude": "1.0", "longitude": "1.0" },
                { "iata": "SHJ", "latitude": "25.3286", "longitude": "55.5172", "country": "AE" }
            ]"#,
        )
        .unwrap();

        let locations = load_locations(&path).unwrap();

        assert_eq!(locations.len(), 2);
        assert!(locations.get(&code("SHJ")).is_some());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_flights(dir.path().join("absent.json")).unwrap_err();

        assert!(matches!(err, SnapshotError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.json");
        std::fs::write(&path, r#"[{ "departure": "yesterday" }]"#).unwrap();

        assert!(matches!(
            load_flights(&path),
            Err(SnapshotError::Json { .. })
        ));
    }

    #[test]
    fn invalid_code_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.json");
        std::fs::write(&path, FLIGHTS.replace("\"AUH\"", "\"AU\"")).unwrap();

        assert!(matches!(
            load_flights(&path),
            Err(SnapshotError::Json { .. })
        ));
    }
}
