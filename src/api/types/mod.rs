//! API request and response types

pub mod error;
pub mod json;
pub mod route;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use route::{DistanceRequest, DistanceResponse, RouteQuery, RouteResponse, StopsPathRequest};
