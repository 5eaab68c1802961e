//! Itinerary planner.
//!
//! Two searches run over a [`FlightCatalog`](crate::catalog::FlightCatalog):
//!
//! - one-way connections from an origin to a destination, found by a
//!   depth-first walk that treats nearby airports as interchangeable;
//! - out-and-back trips from a set of home airports within a date window.

mod config;
mod rank;
mod returns;
mod search;

pub use config::SearchConfig;
pub use rank::rank_connections;
pub use returns::{ReturnQuery, find_return_journeys};
pub use search::{ConnectionQuery, Planner, SearchError, SearchResult, find_connections};
