//! Convenience result type alias for rosterwatch.

use crate::error::AppError;

/// A specialized `Result` type for rosterwatch operations.
pub type AppResult<T> = Result<T, AppError>;
