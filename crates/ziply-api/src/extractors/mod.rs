//! Custom Axum extractors.

pub mod bearer;
pub mod json;

pub use bearer::BearerToken;
pub use json::ApiJson;
