//! Out-and-back trip matching.
//!
//! Given a set of home airports and a date window, pairs every flight
//! leaving home with every flight coming back from the same place, keeping
//! pairs that leave enough time on the ground in between.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::catalog::FlightCatalog;
use crate::domain::{Connection, Destination, Flight, IataCode};

use super::rank::rank_connections;
use super::search::{SearchError, parse_date};

/// Request for a return-journey search.
#[derive(Debug, Clone)]
pub struct ReturnQuery {
    /// Airports the traveler can leave from and come back to.
    pub home_airports: HashSet<IataCode>,

    /// First day of the window.
    pub start_date: NaiveDate,

    /// Last day of the window, inclusive.
    pub end_date: NaiveDate,
}

impl ReturnQuery {
    /// Create a new query.
    pub fn new(home_airports: HashSet<IataCode>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            home_airports,
            start_date,
            end_date,
        }
    }

    /// Build a query from raw request parameters.
    ///
    /// `homes` is a comma-separated list of codes, e.g. `"LTN,LGW"`.
    pub fn parse(homes: &str, start_date: &str, end_date: &str) -> Result<Self, SearchError> {
        let home_airports = homes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                IataCode::parse_normalized(s)
                    .map_err(|e| SearchError::InvalidRequest(format!("home airport {s:?}: {e}")))
            })
            .collect::<Result<HashSet<_>, _>>()?;

        let query = Self::new(home_airports, parse_date(start_date)?, parse_date(end_date)?);
        query.validate()?;
        Ok(query)
    }

    /// Validate the query.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.home_airports.is_empty() {
            return Err(SearchError::InvalidRequest(
                "at least one home airport is required".to_string(),
            ));
        }
        if self.end_date < self.start_date {
            return Err(SearchError::InvalidRequest(
                "end date is before start date".to_string(),
            ));
        }
        Ok(())
    }
}

/// Flights between home and one away airport.
#[derive(Debug, Default)]
struct AwayLegs {
    /// Home to here.
    outbound: Vec<Arc<Flight>>,
    /// Here to home.
    inbound: Vec<Arc<Flight>>,
}

/// Find out-and-back trips from `home_airports` within the date window.
///
/// Only flights departing on or after `start_date` and arriving by the end
/// of `end_date` are used. A pair is kept when the return flight leaves
/// strictly more than `min_gap` after the outbound lands. Destinations are
/// sorted by code; each destination's trips are ordered by final arrival.
///
/// Home membership is by exact code: nearby airports are not substituted.
pub fn find_return_journeys(
    catalog: &FlightCatalog,
    home_airports: &HashSet<IataCode>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    min_gap: Duration,
) -> Vec<Destination> {
    // BTreeMap keeps away airports sorted by code
    let mut away: BTreeMap<IataCode, AwayLegs> = BTreeMap::new();

    for flight in catalog.flights() {
        let from_home = home_airports.contains(&flight.from.code);
        let to_home = home_airports.contains(&flight.to.code);

        // Home-to-home hops aren't trips; flights not touching home are irrelevant
        if from_home == to_home {
            continue;
        }
        if !flight.departs_on_or_after(start_date) || !flight.arrives_by_end_of(end_date) {
            continue;
        }

        if from_home {
            away.entry(flight.to.code)
                .or_default()
                .outbound
                .push(Arc::clone(flight));
        } else {
            away.entry(flight.from.code)
                .or_default()
                .inbound
                .push(Arc::clone(flight));
        }
    }

    let mut destinations = Vec::new();

    for (code, legs) in away {
        let mut connections = Vec::new();

        for outbound in &legs.outbound {
            for inbound in &legs.inbound {
                if inbound.departure - outbound.arrival <= min_gap {
                    continue;
                }
                match Connection::round_trip(Arc::clone(outbound), Arc::clone(inbound)) {
                    Ok(connection) => connections.push(connection),
                    Err(e) => debug!(airport = %code, error = %e, "Discarding invalid pair"),
                }
            }
        }

        if connections.is_empty() {
            continue;
        }

        let Some(airport) = catalog.airport(&code) else {
            continue;
        };

        destinations.push(Destination {
            airport: airport.clone(),
            connections: rank_connections(connections),
        });
    }

    let mut homes: Vec<&str> = home_airports.iter().map(IataCode::as_str).collect();
    homes.sort_unstable();
    info!(
        homes = %homes.join(","),
        start = %start_date,
        end = %end_date,
        destinations = destinations.len(),
        "Return journey search complete"
    );

    destinations
}
