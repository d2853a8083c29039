//! Share lifecycle: create, view, download, and delete shares.

pub mod access;
pub mod blob;
pub mod expiry;
pub mod ids;
pub mod link;
pub mod service;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AccessService;
pub use blob::release_blob;
pub use service::{CreateShareInput, FileSource, InlineFile, ShareService};
pub use settings::ShareSettings;
