//! Route handlers.

pub mod blob;
pub mod health;
pub mod share;
