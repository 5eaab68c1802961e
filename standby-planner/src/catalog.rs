//! In-memory flight catalog.
//!
//! A `FlightCatalog` is the immutable snapshot of published flights that one
//! search runs over. It indexes flights by origin and knows which airports
//! are served at all, which is the universe the nearby-airport lookup is
//! restricted to.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Airport, Flight, IataCode};

/// Immutable collection of flights for one search.
///
/// Flights keep their catalog order; every lookup returns them in that
/// order so results are reproducible for a given snapshot.
#[derive(Debug, Clone, Default)]
pub struct FlightCatalog {
    flights: Vec<Arc<Flight>>,
    /// Indices into `flights`, ascending, per origin code.
    by_origin: HashMap<IataCode, Vec<usize>>,
    airports: HashMap<IataCode, Airport>,
}

impl FlightCatalog {
    /// Build a catalog from flights in provider order.
    pub fn new(flights: Vec<Flight>) -> Self {
        let flights: Vec<Arc<Flight>> = flights.into_iter().map(Arc::new).collect();
        let mut by_origin: HashMap<IataCode, Vec<usize>> = HashMap::new();
        let mut airports: HashMap<IataCode, Airport> = HashMap::new();

        for (idx, flight) in flights.iter().enumerate() {
            by_origin.entry(flight.from.code).or_default().push(idx);
            // First record of a code wins for its display name
            airports
                .entry(flight.from.code)
                .or_insert_with(|| flight.from.clone());
            airports
                .entry(flight.to.code)
                .or_insert_with(|| flight.to.clone());
        }

        Self {
            flights,
            by_origin,
            airports,
        }
    }

    /// All flights in catalog order.
    pub fn flights(&self) -> &[Arc<Flight>] {
        &self.flights
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Flights departing from any of `codes`, merged back into catalog order.
    pub fn departures_from_any<'a, I>(&self, codes: I) -> Vec<&Arc<Flight>>
    where
        I: IntoIterator<Item = &'a IataCode>,
    {
        let mut indices: Vec<usize> = codes
            .into_iter()
            .filter_map(|code| self.by_origin.get(code))
            .flatten()
            .copied()
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|idx| &self.flights[idx]).collect()
    }

    /// The served-airport universe, keyed by code.
    pub fn airport_map(&self) -> &HashMap<IataCode, Airport> {
        &self.airports
    }

    /// Look up a served airport.
    pub fn airport(&self, code: &IataCode) -> Option<&Airport> {
        self.airports.get(code)
    }

    /// All served airports, sorted by code.
    pub fn airports(&self) -> Vec<&Airport> {
        let mut airports: Vec<&Airport> = self.airports.values().collect();
        airports.sort_by_key(|a| a.code);
        airports
    }
}
