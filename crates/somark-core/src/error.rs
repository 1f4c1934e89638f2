//! Analysis errors.

use thiserror::Error;

use crate::document::NodeId;

/// Errors raised by the analysis passes.
///
/// Every variant except [`AnalysisError::Overlay`] is a broken precondition:
/// the input is malformed or an operation was called out of contract.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A rectangle had a non-finite coordinate.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A box operation that combines boxes received an unclamped operand.
    #[error("{operation} requires clamped boxes")]
    UnclampedBox { operation: &'static str },

    /// Depth selection was asked for a negative depth.
    #[error("Argument \"depth\" must be non-negative, not {0}")]
    NegativeDepth(i64),

    /// A pass looked up an element that earlier passes never recorded.
    #[error("No derived state for node {0:?}")]
    UnknownNode(NodeId),

    /// The snapshot tree is inconsistent.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Snapshot (de)serialization failed.
    #[error("Snapshot serialization error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The overlay surface failed to draw or clear.
    #[error("Overlay error: {0}")]
    Overlay(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_depth_display() {
        let err = AnalysisError::NegativeDepth(-1);
        assert!(err.to_string().contains("-1"));
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn test_unclamped_display() {
        let err = AnalysisError::UnclampedBox { operation: "crop" };
        assert_eq!(err.to_string(), "crop requires clamped boxes");
    }

    #[test]
    fn test_snapshot_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AnalysisError::from(json_err);
        assert!(matches!(err, AnalysisError::Snapshot(_)));
    }
}
