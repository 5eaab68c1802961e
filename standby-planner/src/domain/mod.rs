//! Domain types for the standby itinerary planner.
//!
//! This module contains the core domain model: airports, flights, layovers
//! and the itineraries assembled from them. Types that carry invariants
//! enforce them at construction time, so code that receives them can trust
//! their validity.

mod airport;
mod connection;
mod error;
mod flight;
mod layover;

pub use airport::{Airport, IataCode, InvalidIataCode};
pub use connection::{Connection, Destination, format_duration};
pub use error::DomainError;
pub use flight::{Flight, Price};
pub use layover::{Layover, classify_layovers};
