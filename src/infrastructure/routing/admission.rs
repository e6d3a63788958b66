//! Admission control in front of the routing provider

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::coordinate::Coordinate;
use crate::domain::route::RouteKey;

/// How cache misses are admitted to the rate-sensitive provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrottlePolicy {
    /// FIFO queue; every request is eventually served by the provider
    #[default]
    Queue,
    /// Legacy mode; requests arriving too soon get a straight line at once
    Immediate,
}

impl std::fmt::Display for ThrottlePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queue => write!(f, "queue"),
            Self::Immediate => write!(f, "immediate"),
        }
    }
}

/// Resolves a cache miss under some admission policy
///
/// The returned path is already oriented in the direction the key was
/// requested in, and the implementation is responsible for caching it.
#[async_trait]
pub trait RouteAdmission: Send + Sync + Debug {
    async fn admit(&self, key: RouteKey) -> Vec<Coordinate>;

    /// Requests waiting to be served
    fn pending(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_deserializes_lowercase() {
        let policy: ThrottlePolicy = serde_json::from_str("\"immediate\"").unwrap();
        assert_eq!(policy, ThrottlePolicy::Immediate);
        assert_eq!(ThrottlePolicy::default(), ThrottlePolicy::Queue);
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(ThrottlePolicy::Queue.to_string(), "queue");
        assert_eq!(ThrottlePolicy::Immediate.to_string(), "immediate");
    }
}
