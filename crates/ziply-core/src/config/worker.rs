//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Expiry sweep and orphan janitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduled jobs run in this process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for the expired share sweep.
    #[serde(default = "default_sweep_cron")]
    pub sweep_cron: String,
    /// Maximum number of records removed per sweep batch.
    #[serde(default = "default_sweep_batch_size")]
    pub sweep_batch_size: u32,
    /// Cron expression (with seconds) for the orphaned blob janitor.
    #[serde(default = "default_janitor_cron")]
    pub janitor_cron: String,
    /// Minimum blob age before an unreferenced blob is removed.
    #[serde(default = "default_orphan_grace")]
    pub orphan_grace_minutes: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_cron: default_sweep_cron(),
            sweep_batch_size: default_sweep_batch_size(),
            janitor_cron: default_janitor_cron(),
            orphan_grace_minutes: default_orphan_grace(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_cron() -> String {
    "0 * * * * *".to_string()
}

fn default_sweep_batch_size() -> u32 {
    100
}

fn default_janitor_cron() -> String {
    "0 0 * * * *".to_string()
}

fn default_orphan_grace() -> i64 {
    60
}
