//! Status and trace events streamed during a dispatch

use fugue_types::{ExecutionStatus, TransactionTrace};
use tokio::sync::mpsc;

/// One message on a dispatch's reply channel.
///
/// Workers and the pool stream these to the coordinator that owns the
/// request: status transitions per job, plus one trace per transaction
/// in completion order (which equals job order, since jobs run
/// sequentially).
#[derive(Clone, Debug)]
pub enum ExecutionEvent {
    /// Job lifecycle update
    Status {
        /// Correlation token of the owning request
        request_id: u64,
        /// Index of the job within its batch
        job_index: usize,
        /// New status
        status: ExecutionStatus,
    },
    /// A transaction finished (really or synthetically)
    Trace {
        /// Correlation token of the owning request
        request_id: u64,
        /// Index of the job within its batch
        job_index: usize,
        /// The transaction's trace
        trace: TransactionTrace,
    },
}

/// Sending half of a dispatch reply channel
pub type EventSender = mpsc::UnboundedSender<ExecutionEvent>;

/// Receiving half of a dispatch reply channel
pub type EventReceiver = mpsc::UnboundedReceiver<ExecutionEvent>;
