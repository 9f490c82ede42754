//! Floating-origin error types.

/// Errors returned by the floating-origin manager.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum OriginError {
    /// The render scale must be a positive, finite number.
    #[error("invalid argument: render scale must be positive and finite, got {0}")]
    InvalidScale(f64),
}
