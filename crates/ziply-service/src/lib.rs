//! # ziply-service
//!
//! Business logic for Ziply shares. Services orchestrate the record store
//! and the object storage provider to implement the share lifecycle:
//! creation, viewing, downloading, and owner deletion.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod share;

pub use share::{AccessService, ShareService, ShareSettings};
