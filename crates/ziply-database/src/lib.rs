//! # ziply-database
//!
//! Share record persistence. Defines the [`ShareStore`] trait along with a
//! PostgreSQL implementation and an in-memory implementation used for
//! development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryShareStore;
pub use repositories::PgShareRepository;
pub use store::{ShareStore, build_share_store};
