//! Result type alias for knowledge base operations.

use super::context::ErrorContext;
use super::kb_error::KbError;

/// Type alias for Results using KbError.
pub type KbResult<T> = Result<T, KbError>;

/// Extension trait for Result types to add context to errors.
pub trait ResultExt<T> {
    /// Add context to an error if the result is Err.
    fn context(self, ctx: ErrorContext) -> KbResult<T>;

    /// Add context using a closure (only called on error).
    fn with_context<F>(self, f: F) -> KbResult<T>
    where
        F: FnOnce() -> ErrorContext;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<KbError>,
{
    fn context(self, ctx: ErrorContext) -> KbResult<T> {
        self.map_err(|e| e.into().with_context(ctx))
    }

    fn with_context<F>(self, f: F) -> KbResult<T>
    where
        F: FnOnce() -> ErrorContext,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
