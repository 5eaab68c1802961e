//! Search configuration for the itinerary planner.

use chrono::Duration;

use crate::geo::DEFAULT_RADIUS_KM;

/// Configuration parameters for itinerary search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of intermediate stops.
    /// An itinerary has at most `max_stops + 1` flights.
    pub max_stops: usize,

    /// Airports within this distance (km) count as the same endpoint.
    pub radius_km: f64,

    /// Minimum time away before a return flight (minutes).
    /// Gaps of exactly this length are rejected.
    pub min_return_gap_mins: i64,

    /// Maximum number of search nodes to visit before giving up.
    /// `max_stops` bounds depth but not fan-out, so this caps total work.
    pub max_nodes: usize,

    /// Maximum number of one-way connections to return, after ordering.
    pub max_results: Option<usize>,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_stops: usize,
        radius_km: f64,
        min_return_gap_mins: i64,
        max_nodes: usize,
        max_results: Option<usize>,
    ) -> Self {
        Self {
            max_stops,
            radius_km,
            min_return_gap_mins,
            max_nodes,
            max_results,
        }
    }

    /// Returns the minimum return gap as a Duration.
    pub fn min_return_gap(&self) -> Duration {
        Duration::minutes(self.min_return_gap_mins)
    }

    /// Returns the maximum number of flights in one itinerary.
    pub fn max_flights(&self) -> usize {
        self.max_stops + 1
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_stops: 3,
            radius_km: DEFAULT_RADIUS_KM,
            min_return_gap_mins: 180, // 3 hours
            max_nodes: 200_000,
            max_results: None,
        }
    }
}
