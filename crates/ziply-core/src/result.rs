//! Convenience result type alias for Ziply.

use crate::error::AppError;

/// A specialized `Result` type for Ziply operations.
pub type AppResult<T> = Result<T, AppError>;
