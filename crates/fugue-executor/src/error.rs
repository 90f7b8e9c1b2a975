//! Error types for the dispatch engine

use fugue_types::ChainId;
use thiserror::Error;

/// Dispatch engine errors.
///
/// Per-transaction failures and admission rejections are not errors:
/// they travel inline as trace/status payload. Only protocol-level
/// breakage surfaces here.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The target chain has no registered executor
    #[error("chain {0} is not registered")]
    ChainNotFound(ChainId),

    /// The coordinator went away before producing a response
    #[error("request {0} was dropped before a response arrived")]
    ResponseDropped(u64),

    /// A response arrived carrying a different correlation token
    #[error("correlation mismatch: expected request {expected}, got {got}")]
    CorrelationMismatch {
        /// Request id the caller is waiting on
        expected: u64,
        /// Request id the response carried
        got: u64,
    },
}

/// Result type for dispatch operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExecutorError::ChainNotFound(ChainId::new(7));
        assert!(err.to_string().contains('7'));

        let err = ExecutorError::CorrelationMismatch { expected: 1, got: 2 };
        assert!(err.to_string().contains("correlation"));
    }
}
