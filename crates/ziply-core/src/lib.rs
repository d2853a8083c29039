//! # ziply-core
//!
//! Core crate for Ziply. Contains configuration schemas, the object
//! storage trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Ziply crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
