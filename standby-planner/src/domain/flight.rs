//! Flight and price types.
//!
//! A `Flight` is one published standby listing: a directed, timed edge
//! between two airports.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Airport;

/// A listed fare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: Decimal,
    /// 3-letter currency code, e.g. `AED`.
    pub currency: String,
}

impl Price {
    pub fn new(amount: impl Into<Decimal>, currency: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}{}", self.amount, self.currency)
    }
}

/// A single flight from the catalog.
///
/// `departure` is local to the origin airport and `arrival` is local to the
/// destination airport. Neither carries a timezone and they are never
/// converted: every comparison treats them as readings of one nominal clock.
/// `duration_minutes` is the published block time and is what totals use;
/// the timestamps drive ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration_minutes: u32,
    pub from: Airport,
    pub to: Airport,
    pub price: Price,
}

impl Flight {
    /// Returns true if this flight departs on or after midnight of `date`.
    pub fn departs_on_or_after(&self, date: NaiveDate) -> bool {
        self.departure >= date.and_time(NaiveTime::MIN)
    }

    /// Returns true if this flight lands no later than the end of `date`.
    pub fn arrives_by_end_of(&self, date: NaiveDate) -> bool {
        self.arrival.date() <= date
    }
}
