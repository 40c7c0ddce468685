//! Representation Error Types

use thiserror::Error;

/// Errors while planning windows or building representations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReprError {
    /// Piece duration must be a finite, non-negative number of seconds
    #[error("Invalid piece duration: {0} seconds")]
    InvalidDuration(f64),

    /// Window size must be a positive, finite number of seconds
    #[error("Invalid window size: {0} seconds")]
    InvalidWindowSize(f64),

    /// Overlap must lie in [0, 1)
    #[error("Invalid window overlap: {0} (expected a fraction in [0, 1))")]
    InvalidOverlap(f64),

    /// The representation provider could not process a sequence
    #[error("Representation provider failed: {0}")]
    Provider(String),
}
