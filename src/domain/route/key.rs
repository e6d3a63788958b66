//! Route cache key generation

use std::fmt;

use serde::Deserialize;

use crate::domain::coordinate::Coordinate;

/// How the endpoints of a request map onto a cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategy {
    /// (A, B) and (B, A) are distinct entries
    #[default]
    Directional,
    /// Endpoints are sorted so both directions share one entry
    Symmetric,
}

/// Cache key for one stop-to-stop segment
///
/// `origin`/`destination` are the endpoints the cached path runs between.
/// With [`KeyStrategy::Symmetric`] they may be the requested endpoints
/// swapped, in which case `reversed` is set and [`RouteKey::orient`] flips the
/// cached path back into the requested direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteKey {
    key: String,
    origin: Coordinate,
    destination: Coordinate,
    reversed: bool,
}

impl RouteKey {
    /// Creates a directional key for `start -> end`
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self::with_strategy(start, end, KeyStrategy::Directional)
    }

    /// Creates a key using the given strategy
    pub fn with_strategy(start: Coordinate, end: Coordinate, strategy: KeyStrategy) -> Self {
        let reversed = strategy == KeyStrategy::Symmetric && end.total_cmp(&start).is_lt();
        let (origin, destination) = if reversed { (end, start) } else { (start, end) };

        Self {
            key: format!("{};{}", origin, destination),
            origin,
            destination,
            reversed,
        }
    }

    /// Returns the string representation of the key
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Start of the cached path
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// End of the cached path
    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Whether the request runs opposite to the cached path
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Puts a cached path into the direction the caller asked for
    pub fn orient(&self, mut path: Vec<Coordinate>) -> Vec<Coordinate> {
        if self.reversed {
            path.reverse();
        }
        path
    }

    /// Straight segment in the requested direction
    pub fn fallback_path(&self) -> Vec<Coordinate> {
        self.orient(vec![self.origin, self.destination])
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
