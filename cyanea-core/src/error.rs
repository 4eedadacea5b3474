//! Structured error types for the Cyanea ecosystem.

use thiserror::Error;

/// Unified error type for all Cyanea operations.
#[derive(Debug, Error)]
pub enum CyaneaError {
    /// Invalid input (malformed matrix, bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No genomic coordinate is shared by every sample in a comparison
    #[error("no shared regions: {0}")]
    NoSharedRegions(String),

    /// A sample grouping does not line up with the samples it labels
    #[error("invalid grouping: {0}")]
    InvalidGrouping(String),
}

/// Convenience alias used throughout the Cyanea ecosystem.
pub type Result<T> = std::result::Result<T, CyaneaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = CyaneaError::NoSharedRegions("3 samples".into());
        assert_eq!(err.to_string(), "no shared regions: 3 samples");
        let err = CyaneaError::InvalidGrouping("expected 4 labels, got 3".into());
        assert!(err.to_string().starts_with("invalid grouping"));
    }
}
