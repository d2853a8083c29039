//! Concrete PostgreSQL repositories.

pub mod share;

pub use share::PgShareRepository;
