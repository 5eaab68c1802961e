//! Depth-first connection search.
//!
//! Finds itineraries from an origin to a destination over the flat flight
//! catalog, treating airports within the nearby radius as the same endpoint.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, trace, warn};

use crate::catalog::FlightCatalog;
use crate::domain::{Connection, Destination, Flight, IataCode};
use crate::geo::{AirportLocations, GeoIndex, NearbyCache};

use super::config::SearchConfig;
use super::rank::rank_connections;
use super::returns::{ReturnQuery, find_return_journeys};

/// Error from itinerary search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

/// Request for a one-way connection search.
#[derive(Debug, Clone)]
pub struct ConnectionQuery {
    /// Where the traveler starts.
    pub from: IataCode,

    /// Where the traveler wants to end up.
    pub to: IataCode,

    /// No leg may depart before midnight of this date.
    pub not_before: NaiveDate,
}

impl ConnectionQuery {
    /// Create a new query.
    pub fn new(from: IataCode, to: IataCode, not_before: NaiveDate) -> Self {
        Self {
            from,
            to,
            not_before,
        }
    }

    /// Build a query from raw request parameters.
    ///
    /// Codes are normalized (trimmed, uppercased); the date must be
    /// `YYYY-MM-DD`.
    pub fn parse(from: &str, to: &str, date: &str) -> Result<Self, SearchError> {
        let from = IataCode::parse_normalized(from)
            .map_err(|e| SearchError::InvalidRequest(format!("origin {from:?}: {e}")))?;
        let to = IataCode::parse_normalized(to)
            .map_err(|e| SearchError::InvalidRequest(format!("destination {to:?}: {e}")))?;
        let not_before = parse_date(date)?;

        let query = Self::new(from, to, not_before);
        query.validate()?;
        Ok(query)
    }

    /// Validate the query.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.from == self.to {
            return Err(SearchError::InvalidRequest(
                "origin and destination must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` request date.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, SearchError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| SearchError::InvalidRequest(format!("date {s:?}: {e}")))
}

/// Result of a connection search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Found connections.
    pub connections: Vec<Connection>,

    /// Number of search nodes visited.
    pub nodes_visited: usize,

    /// True if the node ceiling stopped the search early.
    pub truncated: bool,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            connections: Vec::new(),
            nodes_visited: 0,
            truncated: false,
        }
    }
}

/// Find connections from `from` to `to`, in the order the search produces them.
///
/// `max_stops` bounds the intermediate stops, so no connection has more
/// than `max_stops + 1` flights. No ordering is applied; see
/// [`rank_connections`](super::rank_connections).
pub fn find_connections(
    catalog: &FlightCatalog,
    index: GeoIndex<'_>,
    from: IataCode,
    to: IataCode,
    not_before: NaiveDate,
    max_stops: usize,
) -> Vec<Connection> {
    let limits = Limits {
        max_flights: max_stops + 1,
        max_nodes: SearchConfig::default().max_nodes,
    };
    run(catalog, index, from, to, not_before, limits).connections
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    max_flights: usize,
    max_nodes: usize,
}

fn run(
    catalog: &FlightCatalog,
    index: GeoIndex<'_>,
    from: IataCode,
    to: IataCode,
    not_before: NaiveDate,
    limits: Limits,
) -> SearchResult {
    let mut dfs = Dfs {
        catalog,
        nearby: NearbyCache::new(index),
        to,
        not_before,
        limits,
        path: Vec::with_capacity(limits.max_flights),
        visited: HashSet::new(),
        found: Vec::new(),
        nodes_visited: 0,
        truncated: false,
    };

    // The origin's neighbourhood counts as already visited, so no path
    // can "arrive" back next to where it started.
    dfs.visited.insert(from);
    dfs.visited.extend(dfs.nearby.nearby(from).iter().copied());

    dfs.visit(from);

    debug!(
        from = %from,
        to = %to,
        connections = dfs.found.len(),
        nodes = dfs.nodes_visited,
        airports_resolved = dfs.nearby.len(),
        truncated = dfs.truncated,
        "Connection search complete"
    );

    SearchResult {
        connections: dfs.found,
        nodes_visited: dfs.nodes_visited,
        truncated: dfs.truncated,
    }
}

/// DFS state: one path and one visited set, extended and unwound in place.
struct Dfs<'a, 'g> {
    catalog: &'a FlightCatalog,
    nearby: NearbyCache<'g>,
    to: IataCode,
    not_before: NaiveDate,
    limits: Limits,
    path: Vec<Arc<Flight>>,
    visited: HashSet<IataCode>,
    found: Vec<Connection>,
    nodes_visited: usize,
    truncated: bool,
}

impl Dfs<'_, '_> {
    fn visit(&mut self, current: IataCode) {
        self.nodes_visited += 1;
        if self.nodes_visited > self.limits.max_nodes {
            if !self.truncated {
                warn!(
                    max_nodes = self.limits.max_nodes,
                    found = self.found.len(),
                    "Connection search hit node ceiling, returning partial results"
                );
            }
            self.truncated = true;
            return;
        }

        let nearby = self.nearby.nearby(current);

        if current == self.to || nearby.contains(&self.to) {
            if !self.path.is_empty() {
                match Connection::one_way(self.path.clone()) {
                    Ok(connection) => self.found.push(connection),
                    Err(e) => debug!(error = %e, "Discarding invalid path"),
                }
            }
            return;
        }

        // Stops exhausted
        if self.path.len() >= self.limits.max_flights {
            return;
        }

        let catalog = self.catalog;
        let origins = std::iter::once(&current).chain(nearby.iter());
        let candidates = catalog.departures_from_any(origins);

        trace!(
            airport = %current,
            depth = self.path.len(),
            nearby = nearby.len(),
            candidates = candidates.len(),
            "Expanding airport"
        );

        for flight in candidates {
            if self.truncated {
                break;
            }
            if !flight.departs_on_or_after(self.not_before) {
                continue;
            }
            if self.visited.contains(&flight.to.code) {
                continue;
            }
            if let Some(last) = self.path.last()
                && flight.departure <= last.arrival
            {
                continue;
            }

            let next = flight.to.code;
            self.visited.insert(next);
            self.path.push(Arc::clone(flight));

            self.visit(next);

            self.path.pop();
            self.visited.remove(&next);
        }
    }
}

/// Itinerary planner over one catalog snapshot.
pub struct Planner<'a> {
    catalog: &'a FlightCatalog,
    locations: &'a AirportLocations,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(
        catalog: &'a FlightCatalog,
        locations: &'a AirportLocations,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            catalog,
            locations,
            config,
        }
    }

    /// The nearby-airport index this planner searches with.
    pub fn geo_index(&self) -> GeoIndex<'a> {
        GeoIndex::new(
            self.locations,
            self.catalog.airport_map(),
            self.config.radius_km,
        )
    }

    /// Search for one-way connections, ordered by final arrival.
    pub fn search(&self, query: &ConnectionQuery) -> Result<SearchResult, SearchError> {
        query.validate()?;

        let limits = Limits {
            max_flights: self.config.max_flights(),
            max_nodes: self.config.max_nodes,
        };
        let mut result = run(
            self.catalog,
            self.geo_index(),
            query.from,
            query.to,
            query.not_before,
            limits,
        );

        result.connections = rank_connections(result.connections);
        if let Some(max) = self.config.max_results {
            result.connections.truncate(max);
        }

        Ok(result)
    }

    /// Find out-and-back trips from the query's home airports.
    pub fn return_journeys(&self, query: &ReturnQuery) -> Result<Vec<Destination>, SearchError> {
        query.validate()?;

        Ok(find_return_journeys(
            self.catalog,
            &query.home_airports,
            query.start_date,
            query.end_date,
            self.config.min_return_gap(),
        ))
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
