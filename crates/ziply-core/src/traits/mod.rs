//! Core traits defined in `ziply-core` and implemented by other crates.

pub mod storage;

pub use storage::{ObjectStorage, SignedUpload, StoredObject};
