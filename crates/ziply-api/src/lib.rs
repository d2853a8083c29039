//! # ziply-api
//!
//! HTTP API layer for Ziply built on Axum.
//!
//! Provides the share endpoints, the signed blob endpoints used by the local
//! storage provider, middleware (CORS, compression, request logging), DTOs,
//! and the mapping from [`ziply_core::AppError`] to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve, shutdown_signal};
pub use error::ApiError;
pub use state::AppState;
