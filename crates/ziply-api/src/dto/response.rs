//! Response DTOs.
//!
//! Share payloads (`CreatedShare`, `ShareView`, `DownloadLink`, `UploadGrant`)
//! are serialized straight from `ziply-entity`.

use serde::{Deserialize, Serialize};

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answers, otherwise `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Record store reachable.
    pub database: bool,
    /// Object storage reachable.
    pub storage: bool,
}
