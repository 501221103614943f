//! Convenience result type alias for Shipdeck.

use crate::error::AppError;

/// A specialized `Result` type for Shipdeck operations.
pub type AppResult<T> = Result<T, AppError>;
