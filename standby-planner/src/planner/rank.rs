//! Ordering of search results.

use crate::domain::Connection;

/// Order connections by the arrival of their final flight, earliest first.
///
/// The sort is stable: connections arriving at the same moment keep the
/// order the search produced them in. Direct flights get no special
/// treatment.
pub fn rank_connections(mut connections: Vec<Connection>) -> Vec<Connection> {
    connections.sort_by_key(Connection::arrival_time);
    connections
}
