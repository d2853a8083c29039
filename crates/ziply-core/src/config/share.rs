//! Share lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Settings for short id generation and create retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Number of characters in a generated short id.
    #[serde(default = "default_short_id_length")]
    pub short_id_length: usize,
    /// How many fresh ids to try before giving up on a collision.
    #[serde(default = "default_max_id_attempts")]
    pub max_id_attempts: u32,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            short_id_length: default_short_id_length(),
            max_id_attempts: default_max_id_attempts(),
        }
    }
}

fn default_short_id_length() -> usize {
    6
}

fn default_max_id_attempts() -> u32 {
    5
}
