//! Error types for reorder resolution.

/// Errors that abort resolution of a whole line.
///
/// Malformed individual expressions never surface here: they are left
/// untouched in the text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    /// SCANNING kept making progress past the configured sweep cap.
    #[error("sweep limit exceeded after {sweeps} sweeps")]
    SweepLimitExceeded { sweeps: usize },
}

/// Result type for reorder operations.
pub type Result<T> = std::result::Result<T, ReorderError>;
