//! Connection and destination types.
//!
//! A `Connection` is a complete itinerary: one or more flights chained in
//! time, with the layovers between them already classified.

use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{Airport, DomainError, Flight, Layover, classify_layovers};

/// A complete itinerary.
///
/// # Invariants
///
/// - At least one flight
/// - Each flight departs strictly after the previous one arrives
/// - `layovers().len() == flights().len() - 1`
/// - `has_airport_change_layover()` is true iff any layover changes airport
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    flights: Vec<Arc<Flight>>,
    total_duration_minutes: i64,
    layovers: Vec<Layover>,
    has_airport_change_layover: bool,
    // Cached from the first/last flight, guaranteed present by construction
    #[serde(skip)]
    departure: NaiveDateTime,
    #[serde(skip)]
    arrival: NaiveDateTime,
}

impl Connection {
    /// Builds a one-way itinerary.
    ///
    /// The total duration is the flight time of every leg plus every layover.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `flights` is empty or a leg departs before or exactly
    /// when the previous leg lands.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use chrono::NaiveDateTime;
    /// use standby_planner::domain::{Airport, Connection, Flight, IataCode, Price};
    ///
    /// let at = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
    /// let airport = |c| Airport::new(IataCode::parse(c).unwrap(), c);
    ///
    /// let first = Arc::new(Flight {
    ///     departure: at("2024-03-15 10:00"),
    ///     arrival: at("2024-03-15 11:00"),
    ///     duration_minutes: 60,
    ///     from: airport("AUH"),
    ///     to: airport("MCT"),
    ///     price: Price::new(42, "AED"),
    /// });
    /// let second = Arc::new(Flight {
    ///     departure: at("2024-03-15 12:30"),
    ///     arrival: at("2024-03-15 16:00"),
    ///     duration_minutes: 210,
    ///     from: airport("MCT"),
    ///     to: airport("ALA"),
    ///     price: Price::new(42, "AED"),
    /// });
    ///
    /// let connection = Connection::one_way(vec![first, second]).unwrap();
    /// assert_eq!(connection.layovers().len(), 1);
    /// assert_eq!(connection.total_duration_minutes(), 60 + 90 + 210);
    /// ```
    pub fn one_way(flights: Vec<Arc<Flight>>) -> Result<Self, DomainError> {
        let (departure, arrival) = validate_chain(&flights)?;
        let layovers = classify_layovers(&flights);

        let flight_minutes: i64 = flights
            .iter()
            .map(|f| i64::from(f.duration_minutes))
            .sum();
        let layover_minutes: i64 = layovers.iter().map(Layover::duration_minutes).sum();

        Ok(Self::assemble(
            flights,
            flight_minutes + layover_minutes,
            layovers,
            departure,
            arrival,
        ))
    }

    /// Builds an out-and-back pair: home to `outbound.to`, then back home.
    ///
    /// The single layover is always recorded at the away airport, and the
    /// total duration only counts the two flights, not the time spent away.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `inbound` departs before or exactly when `outbound` lands.
    pub fn round_trip(outbound: Arc<Flight>, inbound: Arc<Flight>) -> Result<Self, DomainError> {
        let flights = vec![outbound, inbound];
        let (departure, arrival) = validate_chain(&flights)?;

        let layover = Layover::SameAirport {
            airport: flights[1].from.clone(),
            duration_minutes: (flights[1].departure - flights[0].arrival).num_minutes(),
        };
        let total =
            i64::from(flights[0].duration_minutes) + i64::from(flights[1].duration_minutes);

        Ok(Self::assemble(
            flights,
            total,
            vec![layover],
            departure,
            arrival,
        ))
    }

    fn assemble(
        flights: Vec<Arc<Flight>>,
        total_duration_minutes: i64,
        layovers: Vec<Layover>,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
    ) -> Self {
        let has_airport_change_layover = layovers.iter().any(Layover::is_airport_change);
        Self {
            flights,
            total_duration_minutes,
            layovers,
            has_airport_change_layover,
            departure,
            arrival,
        }
    }

    /// Returns all flights in order.
    pub fn flights(&self) -> &[Arc<Flight>] {
        &self.flights
    }

    /// Returns the layovers in order.
    pub fn layovers(&self) -> &[Layover] {
        &self.layovers
    }

    pub fn total_duration_minutes(&self) -> i64 {
        self.total_duration_minutes
    }

    pub fn has_airport_change_layover(&self) -> bool {
        self.has_airport_change_layover
    }

    /// Returns the number of intermediate stops (flights - 1).
    pub fn stop_count(&self) -> usize {
        self.flights.len() - 1
    }

    /// Returns true if this is a single flight.
    pub fn is_direct(&self) -> bool {
        self.flights.len() == 1
    }

    /// Departure of the first flight.
    pub fn departure_time(&self) -> NaiveDateTime {
        self.departure
    }

    /// Arrival of the final flight.
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.arrival
    }

    /// Where the itinerary starts.
    pub fn origin(&self) -> &Airport {
        &self.flights[0].from
    }

    /// Where the itinerary ends.
    pub fn destination(&self) -> &Airport {
        &self.flights[self.flights.len() - 1].to
    }

    /// Sum of the listed fares, if every leg is priced in the same currency.
    pub fn total_price(&self) -> Option<(Decimal, &str)> {
        let currency = self.flights[0].price.currency.as_str();
        if self.flights.iter().any(|f| f.price.currency != currency) {
            return None;
        }
        Some((self.flights.iter().map(|f| f.price.amount).sum(), currency))
    }
}

/// Checks the chain invariant and returns the first departure and last arrival.
fn validate_chain(
    flights: &[Arc<Flight>],
) -> Result<(NaiveDateTime, NaiveDateTime), DomainError> {
    let (first, last) = match (flights.first(), flights.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(DomainError::EmptyConnection),
    };

    for pair in flights.windows(2) {
        if pair[1].departure <= pair[0].arrival {
            return Err(DomainError::OutOfOrder {
                airport: pair[1].from.code,
                arrival: pair[0].arrival,
                departure: pair[1].departure,
            });
        }
    }

    Ok((first.departure, last.arrival))
}

/// A destination reachable from a set of home airports and back.
#[derive(Debug, Clone, Serialize)]
pub struct Destination {
    pub airport: Airport,
    pub connections: Vec<Connection>,
}

/// Format a minute count as `"Xh Ym"`.
pub fn format_duration(minutes: i64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IataCode, Price};

    fn airport(code: &str) -> Airport {
        Airport::new(IataCode::parse(code).unwrap(), code)
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn flight(from: &str, to: &str, dep: &str, arr: &str, mins: u32) -> Arc<Flight> {
        Arc::new(Flight {
            departure: at(dep),
            arrival: at(arr),
            duration_minutes: mins,
            from: airport(from),
            to: airport(to),
            price: Price::new(42, "AED"),
        })
    }

    #[test]
    fn direct_connection() {
        let f = flight("AUH", "ALA", "2024-03-15 10:00", "2024-03-15 15:30", 270);
        let c = Connection::one_way(vec![f]).unwrap();

        assert!(c.is_direct());
        assert_eq!(c.stop_count(), 0);
        assert!(c.layovers().is_empty());
        assert!(!c.has_airport_change_layover());
        assert_eq!(c.total_duration_minutes(), 270);
        assert_eq!(c.departure_time(), at("2024-03-15 10:00"));
        assert_eq!(c.arrival_time(), at("2024-03-15 15:30"));
        assert_eq!(c.origin().code.as_str(), "AUH");
        assert_eq!(c.destination().code.as_str(), "ALA");
    }

    #[test]
    fn one_way_total_includes_layovers() {
        let a = flight("AUH", "MCT", "2024-03-15 10:00", "2024-03-15 11:00", 60);
        let b = flight("MCT", "ALA", "2024-03-15 12:00", "2024-03-15 17:00", 300);
        let c = Connection::one_way(vec![a, b]).unwrap();

        assert_eq!(c.total_duration_minutes(), 60 + 60 + 300);
        assert_eq!(c.stop_count(), 1);
    }

    #[test]
    fn one_way_flags_airport_change() {
        let a = flight("AUH", "SHJ", "2024-03-15 10:00", "2024-03-15 11:00", 60);
        let b = flight("DXB", "ALA", "2024-03-15 13:00", "2024-03-15 18:00", 300);
        let c = Connection::one_way(vec![a, b]).unwrap();

        assert!(c.has_airport_change_layover());
        assert!(c.layovers()[0].is_airport_change());
    }

    #[test]
    fn empty_connection_rejected() {
        assert!(matches!(
            Connection::one_way(vec![]),
            Err(DomainError::EmptyConnection)
        ));
    }

    #[test]
    fn departure_at_arrival_instant_rejected() {
        let a = flight("AUH", "MCT", "2024-03-15 10:00", "2024-03-15 11:00", 60);
        let b = flight("MCT", "ALA", "2024-03-15 11:00", "2024-03-15 16:00", 300);

        assert!(matches!(
            Connection::one_way(vec![a, b]),
            Err(DomainError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn round_trip_excludes_layover_from_total() {
        let out = flight("LTN", "MLE", "2024-03-01 09:00", "2024-03-01 21:00", 600);
        let back = flight("MLE", "LTN", "2024-03-05 08:00", "2024-03-05 16:00", 660);
        let c = Connection::round_trip(out, back).unwrap();

        assert_eq!(c.total_duration_minutes(), 600 + 660);
        assert_eq!(c.layovers().len(), 1);
        assert_eq!(
            c.layovers()[0],
            Layover::SameAirport {
                airport: airport("MLE"),
                duration_minutes: (at("2024-03-05 08:00") - at("2024-03-01 21:00")).num_minutes(),
            }
        );
        assert!(!c.has_airport_change_layover());
    }

    #[test]
    fn round_trip_rejects_overlap() {
        let out = flight("LTN", "MLE", "2024-03-01 09:00", "2024-03-01 21:00", 600);
        let back = flight("MLE", "LTN", "2024-03-01 20:00", "2024-03-02 04:00", 660);

        assert!(Connection::round_trip(out, back).is_err());
    }

    #[test]
    fn total_price_same_currency() {
        let a = flight("AUH", "MCT", "2024-03-15 10:00", "2024-03-15 11:00", 60);
        let b = flight("MCT", "ALA", "2024-03-15 12:00", "2024-03-15 17:00", 300);
        let c = Connection::one_way(vec![a, b]).unwrap();

        assert_eq!(c.total_price(), Some((Decimal::from(84), "AED")));
    }

    #[test]
    fn total_price_sums_fractional_fares_exactly() {
        let mut a = (*flight("AUH", "MCT", "2024-03-15 10:00", "2024-03-15 11:00", 60)).clone();
        let mut b = (*flight("MCT", "ALA", "2024-03-15 12:00", "2024-03-15 17:00", 300)).clone();
        a.price = Price::new(Decimal::new(1, 1), "EUR");
        b.price = Price::new(Decimal::new(2, 1), "EUR");
        let c = Connection::one_way(vec![Arc::new(a), Arc::new(b)]).unwrap();

        assert_eq!(c.total_price(), Some((Decimal::new(3, 1), "EUR")));
        assert_eq!(c.total_price().unwrap().0.to_string(), "0.3");
    }

    #[test]
    fn total_price_mixed_currency() {
        let a = flight("AUH", "MCT", "2024-03-15 10:00", "2024-03-15 11:00", 60);
        let mut b = (*flight("MCT", "ALA", "2024-03-15 12:00", "2024-03-15 17:00", 300)).clone();
        b.price = Price::new(10, "OMR");
        let c = Connection::one_way(vec![a, Arc::new(b)]).unwrap();

        assert_eq!(c.total_price(), None);
    }

    #[test]
    fn serializes_camel_case() {
        let f = flight("AUH", "ALA", "2024-03-15 10:00", "2024-03-15 15:30", 270);
        let c = Connection::one_way(vec![f]).unwrap();

        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["totalDurationMinutes"], 270);
        assert_eq!(json["hasAirportChangeLayover"], false);
        assert_eq!(json["flights"][0]["from"]["code"], "AUH");
        assert!(json.get("departure").is_none());
    }

    #[test]
    fn format_durations() {
        assert_eq!(format_duration(0), "0h 0m");
        assert_eq!(format_duration(59), "0h 59m");
        assert_eq!(format_duration(60), "1h 0m");
        assert_eq!(format_duration(270), "4h 30m");
        assert_eq!(format_duration(1505), "25h 5m");
    }
}
