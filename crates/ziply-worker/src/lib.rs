//! Scheduled background tasks for Ziply.
//!
//! This crate provides:
//! - A job executor that dispatches named jobs to their handlers
//! - A cron scheduler that triggers jobs periodically
//! - The expired share sweep and the orphaned blob janitor

pub mod executor;
pub mod jobs;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use scheduler::CronScheduler;
