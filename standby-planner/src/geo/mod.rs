//! Nearby-airport lookup.
//!
//! Airports within a fixed radius of each other are treated as
//! interchangeable endpoints by the connection search (e.g. Dubai and
//! Sharjah). This module holds the location table, the great-circle radius
//! query over it, and the per-search memo that makes repeated lookups cheap.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Airport, IataCode};

/// Default radius within which airports count as nearby.
pub const DEFAULT_RADIUS_KM: f64 = 100.0;

/// Error returned when a location record cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("invalid IATA code {0:?}")]
    InvalidCode(String),

    #[error("invalid coordinate {value:?} for {iata}")]
    InvalidCoordinate { iata: String, value: String },
}

/// A raw location row as published, with coordinates as strings.
///
/// Extra columns (country, region, ICAO, name) are accepted and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportLocationRecord {
    pub iata: String,
    pub latitude: String,
    pub longitude: String,
}

/// Position of one airport, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirportLocation {
    pub iata: IataCode,
    pub latitude: f64,
    pub longitude: f64,
}

impl AirportLocation {
    /// Parse a location from its published string form.
    pub fn parse(iata: &str, latitude: &str, longitude: &str) -> Result<Self, LocationError> {
        let code =
            IataCode::parse(iata).map_err(|_| LocationError::InvalidCode(iata.to_string()))?;
        let coordinate = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| LocationError::InvalidCoordinate {
                    iata: iata.to_string(),
                    value: value.to_string(),
                })
        };

        Ok(Self {
            iata: code,
            latitude: coordinate(latitude)?,
            longitude: coordinate(longitude)?,
        })
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &AirportLocation) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        )
    }
}

/// The table of known airport positions.
///
/// Keeps rows in their published order so radius queries are deterministic.
/// Not every code has a row.
#[derive(Debug, Clone, Default)]
pub struct AirportLocations {
    rows: Vec<AirportLocation>,
    by_code: HashMap<IataCode, usize>,
}

impl AirportLocations {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location. A later row for the same code is ignored.
    pub fn add(&mut self, location: AirportLocation) {
        if self.by_code.contains_key(&location.iata) {
            return;
        }
        self.by_code.insert(location.iata, self.rows.len());
        self.rows.push(location);
    }

    /// Build the table from raw records, skipping rows that don't parse.
    ///
    /// Published tables list every airfield, most without an IATA code, so
    /// skipped rows are only logged at debug level.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AirportLocationRecord>,
    {
        let mut table = Self::new();
        let mut skipped = 0usize;

        for record in records {
            match AirportLocation::parse(&record.iata, &record.latitude, &record.longitude) {
                Ok(location) => table.add(location),
                Err(e) => {
                    skipped += 1;
                    debug!(error = %e, "Skipping airport location row");
                }
            }
        }

        debug!(
            locations = table.len(),
            skipped, "Loaded airport locations"
        );
        table
    }

    /// Look up the position of an airport.
    pub fn get(&self, code: &IataCode) -> Option<&AirportLocation> {
        self.by_code.get(code).map(|&idx| &self.rows[idx])
    }

    /// Iterate rows in table order.
    pub fn iter(&self) -> impl Iterator<Item = &AirportLocation> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distance between two airports, if both are located.
    pub fn distance_km(&self, a: &IataCode, b: &IataCode) -> Option<f64> {
        Some(self.get(a)?.distance_km(self.get(b)?))
    }
}

/// Radius query over the location table, restricted to served airports.
///
/// Only airports in `served` (the catalog's airport universe) are ever
/// returned, and the reference airport is never its own neighbour.
#[derive(Debug, Clone, Copy)]
pub struct GeoIndex<'a> {
    locations: &'a AirportLocations,
    served: &'a HashMap<IataCode, Airport>,
    radius_km: f64,
}

impl<'a> GeoIndex<'a> {
    /// Create an index over `locations`, limited to `served` airports.
    pub fn new(
        locations: &'a AirportLocations,
        served: &'a HashMap<IataCode, Airport>,
        radius_km: f64,
    ) -> Self {
        Self {
            locations,
            served,
            radius_km,
        }
    }

    /// Served airports within the radius of `code`, in table order.
    ///
    /// The boundary is inclusive. An airport with no known position has no
    /// neighbours; that is logged, never an error.
    pub fn nearby_airports(&self, code: &IataCode) -> Vec<Airport> {
        let Some(centre) = self.locations.get(code) else {
            debug!(airport = %code, "Couldn't determine location, assuming no nearby airports");
            return Vec::new();
        };

        self.locations
            .iter()
            .filter(|loc| loc.iata != *code)
            .filter_map(|loc| {
                let airport = self.served.get(&loc.iata)?;
                (centre.distance_km(loc) <= self.radius_km).then(|| airport.clone())
            })
            .collect()
    }
}

/// Request-scoped memo of nearby-airport lookups.
///
/// Owned by a single search invocation and dropped with it. The `Rc`
/// handles keep it on one thread.
#[derive(Debug)]
pub struct NearbyCache<'a> {
    index: GeoIndex<'a>,
    resolved: HashMap<IataCode, Rc<HashSet<IataCode>>>,
}

impl<'a> NearbyCache<'a> {
    pub fn new(index: GeoIndex<'a>) -> Self {
        Self {
            index,
            resolved: HashMap::new(),
        }
    }

    /// Codes of the served airports near `code`, computed at most once.
    pub fn nearby(&mut self, code: IataCode) -> Rc<HashSet<IataCode>> {
        let index = self.index;
        self.resolved
            .entry(code)
            .or_insert_with(|| {
                Rc::new(
                    index
                        .nearby_airports(&code)
                        .into_iter()
                        .map(|a| a.code)
                        .collect(),
                )
            })
            .clone()
    }

    /// Number of distinct airports resolved so far.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
