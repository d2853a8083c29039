//! # ziply-entity
//!
//! Domain entity models for Ziply. Every struct in this crate represents a
//! stored share record or a value object handed between the service and the
//! HTTP layer.

pub mod share;
