//! # ziply-storage
//!
//! Object storage providers for Ziply. Supports the local filesystem (with
//! HMAC-signed URLs served by the API) and S3-compatible object stores
//! (with presigned URLs).

pub mod keys;
pub mod manager;
pub mod providers;
pub mod signer;

pub use manager::StorageManager;
