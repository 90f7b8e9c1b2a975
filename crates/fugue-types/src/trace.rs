//! Per-transaction execution outcomes

use crate::primitives::TransactionId;
use bytes::Bytes;

/// Terminal status of a single transaction's execution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceStatus {
    /// Executed successfully and its effects are committed
    Mined,
    /// Executed but the executive reported a failure (e.g. contract revert)
    ExecutedFailed,
    /// Never executed: the owning job was cancelled before this transaction started
    Cancelled,
}

/// Execution trace for one transaction.
///
/// Produced exactly once per transaction by the executive (or synthesized
/// for cancelled transactions) and surfaced unmodified by the dispatch
/// engine. Executive-internal errors are opaque payload here, never
/// interpreted upstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionTrace {
    /// Identity of the traced transaction
    pub tx_id: TransactionId,
    /// Terminal status
    pub status: TraceStatus,
    /// Return value from the executive (empty unless the call returned data)
    pub return_value: Bytes,
    /// Human-readable failure or cancellation reason
    pub error: Option<String>,
}

impl TransactionTrace {
    /// Trace for a successfully mined transaction
    pub fn mined(tx_id: TransactionId, return_value: impl Into<Bytes>) -> Self {
        Self {
            tx_id,
            status: TraceStatus::Mined,
            return_value: return_value.into(),
            error: None,
        }
    }

    /// Trace for a transaction the executive failed to apply
    pub fn failed(tx_id: TransactionId, error: impl Into<String>) -> Self {
        Self {
            tx_id,
            status: TraceStatus::ExecutedFailed,
            return_value: Bytes::new(),
            error: Some(error.into()),
        }
    }

    /// Synthetic trace for a transaction that never ran
    pub fn cancelled(tx_id: TransactionId, reason: impl Into<String>) -> Self {
        Self {
            tx_id,
            status: TraceStatus::Cancelled,
            return_value: Bytes::new(),
            error: Some(reason.into()),
        }
    }

    /// Check if the transaction executed successfully
    pub fn is_success(&self) -> bool {
        self.status == TraceStatus::Mined
    }
}
