//! Standby flight itinerary planner.
//!
//! Answers two questions over a snapshot of published flights: "how can I
//! get from here to there, leaving on or after this date?" and "where can I
//! fly to and back from home within these dates?"

pub mod catalog;
pub mod domain;
pub mod geo;
pub mod planner;
pub mod snapshot;
