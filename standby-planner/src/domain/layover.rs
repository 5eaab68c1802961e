//! Layover classification.
//!
//! A layover is the ground time between two consecutive legs. When the
//! next leg leaves from a different (nearby) airport than the previous leg
//! landed at, the traveler has to self-transfer, so that case is its own
//! variant rather than a flag on a shared shape.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Airport, Flight};

/// Ground time between two consecutive legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Layover {
    /// The next leg departs from the airport the previous leg arrived at.
    SameAirport {
        airport: Airport,
        duration_minutes: i64,
    },
    /// The traveler lands at one airport and departs from another.
    AirportChange {
        arrival_airport: Airport,
        departure_airport: Airport,
        duration_minutes: i64,
    },
}

impl Layover {
    /// Classify the gap between `previous` and `next`.
    pub fn between(previous: &Flight, next: &Flight) -> Self {
        let duration_minutes = (next.departure - previous.arrival).num_minutes();

        if previous.to.code == next.from.code {
            Layover::SameAirport {
                airport: previous.to.clone(),
                duration_minutes,
            }
        } else {
            Layover::AirportChange {
                arrival_airport: previous.to.clone(),
                departure_airport: next.from.clone(),
                duration_minutes,
            }
        }
    }

    /// Returns the ground time in minutes.
    pub fn duration_minutes(&self) -> i64 {
        match self {
            Layover::SameAirport {
                duration_minutes, ..
            }
            | Layover::AirportChange {
                duration_minutes, ..
            } => *duration_minutes,
        }
    }

    /// Returns true if the traveler must change airports.
    pub fn is_airport_change(&self) -> bool {
        matches!(self, Layover::AirportChange { .. })
    }
}

/// Compute the layovers of an ordered run of flights.
///
/// Returns one fewer layover than there are flights; `layovers[i]`
/// describes the gap between `flights[i]` and `flights[i + 1]`.
pub fn classify_layovers(flights: &[Arc<Flight>]) -> Vec<Layover> {
    flights
        .windows(2)
        .map(|pair| Layover::between(&pair[0], &pair[1]))
        .collect()
}
