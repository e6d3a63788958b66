//! Routing infrastructure - OSRM client, resolver and request throttling

mod admission;
mod immediate;
mod osrm;
mod resolver;
mod throttle;

pub use admission::{RouteAdmission, ThrottlePolicy};
pub use immediate::ImmediateThrottler;
pub use osrm::{OsrmConfig, OsrmProvider};
pub use resolver::RouteResolver;
pub use throttle::{PendingRoute, RequestThrottler, ThrottleConfig};
