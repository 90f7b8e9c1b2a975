//! Protocol message shapes for the executor request/response flow

use crate::primitives::ChainId;
use crate::trace::TransactionTrace;
use crate::transaction::Transaction;

/// Correlated request to execute a batch of transactions on one chain.
///
/// Fire-once: owned by exactly one requestor/executor pairing until a
/// terminal response is produced, then discarded.
#[derive(Clone, Debug)]
pub struct ExecutionRequest {
    /// Caller-assigned correlation token
    pub request_id: u64,
    /// Target chain
    pub chain_id: ChainId,
    /// Transactions in the caller's order
    pub transactions: Vec<Transaction>,
}

impl ExecutionRequest {
    /// Create a new execution request
    pub fn new(request_id: u64, chain_id: ChainId, transactions: Vec<Transaction>) -> Self {
        Self {
            request_id,
            chain_id,
            transactions,
        }
    }
}

/// Overall outcome of an execution request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseStatus {
    /// Every job ran to completion
    Executed,
    /// At least one job was turned away by admission control
    Rejected,
}

/// The single terminal reply for an [`ExecutionRequest`].
///
/// `results` always contains exactly one trace per requested transaction,
/// in the caller's original order.
#[derive(Clone, Debug)]
pub struct ExecutionResponse {
    /// Correlation token of the originating request
    pub request_id: u64,
    /// Overall outcome
    pub status: ResponseStatus,
    /// Per-transaction traces in request order
    pub results: Vec<TransactionTrace>,
}

/// Status updates streamed by workers and the pool during a dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The job was admitted and its first transaction is starting
    Running,
    /// The job reached a terminal state (normal or cancelled completion)
    Completed,
    /// Admission control found no idle worker; the job was not queued
    FailedDueToNoAvailableWorker,
    /// A status query named a request the worker no longer tracks
    InvalidRequestId,
}

impl ExecutionStatus {
    /// Check if this status ends a job's lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed | ExecutionStatus::FailedDueToNoAvailableWorker
        )
    }
}
