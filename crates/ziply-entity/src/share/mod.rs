//! Share domain entities.

pub mod expiry;
pub mod grant;
pub mod model;
pub mod view;

pub use expiry::ExpiryDuration;
pub use grant::{CreatedShare, DownloadLink, UploadGrant};
pub use model::{FileDescriptor, NewShare, Share, ShareKind, SharePayload};
pub use view::{FileView, ShareView};
