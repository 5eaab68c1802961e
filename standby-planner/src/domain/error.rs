//! Domain error types.
//!
//! These errors represent invariant violations when assembling itineraries.
//! They are distinct from request validation and snapshot I/O errors.

use chrono::NaiveDateTime;

use super::IataCode;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Connection has no flights
    #[error("connection must have at least one flight")]
    EmptyConnection,

    /// A leg departs before (or exactly when) the previous leg lands
    #[error("flight from {airport} departs at {departure} before previous arrival at {arrival}")]
    OutOfOrder {
        airport: IataCode,
        arrival: NaiveDateTime,
        departure: NaiveDateTime,
    },
}
