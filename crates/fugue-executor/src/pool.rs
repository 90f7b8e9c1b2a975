//! Worker pool - admission-controlled job router
//!
//! A fixed set of workers per chain. Dispatch either claims an Idle
//! worker immediately or rejects the job; excess work is never queued,
//! so a full pool signals the caller to fail fast instead of building
//! unbounded latency.

use crate::event::{EventSender, ExecutionEvent};
use crate::executive::ServicePack;
use crate::worker::{JobAssignment, WorkerHandle};
use fugue_scheduler::ExecutionJob;
use fugue_types::{ChainId, ExecutionStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fixed-size collection of workers with admission control.
///
/// Invariant: at most N jobs run concurrently for N workers, and no
/// worker ever receives a second job while Busy. The per-slot Idle/Busy
/// flags are the only shared mutable state; claims go through a
/// compare-and-swap, so two dispatches can never double-assign a slot.
pub struct WorkerPool {
    chain_id: ChainId,
    workers: Vec<WorkerHandle>,
}

impl WorkerPool {
    /// Spawn `size` workers bound to the chain's services
    pub fn new(service: Arc<ServicePack>, size: usize) -> Self {
        let chain_id = service.context.chain_id;
        let workers = (0..size)
            .map(|id| WorkerHandle::spawn(id, service.clone()))
            .collect();
        info!(%chain_id, workers = size, "worker pool started");
        Self { chain_id, workers }
    }

    /// Route a job to an Idle worker, or reject it.
    ///
    /// Replies immediately on `reply` with `Running` (admitted) or
    /// `FailedDueToNoAvailableWorker` (saturated); the same status is
    /// returned for convenience. Terminal status and per-transaction
    /// traces follow asynchronously on the same channel.
    pub fn dispatch(
        &self,
        request_id: u64,
        job_index: usize,
        job: ExecutionJob,
        reply: &EventSender,
    ) -> ExecutionStatus {
        let mut assignment = JobAssignment {
            request_id,
            job_index,
            job,
            reply: reply.clone(),
        };

        for worker in &self.workers {
            if !worker.try_reserve() {
                continue;
            }
            match worker.assign(assignment) {
                Ok(()) => {
                    debug!(
                        chain_id = %self.chain_id,
                        worker = worker.id(),
                        request_id,
                        job_index,
                        "job admitted"
                    );
                    let _ = reply.send(ExecutionEvent::Status {
                        request_id,
                        job_index,
                        status: ExecutionStatus::Running,
                    });
                    return ExecutionStatus::Running;
                }
                Err(returned) => {
                    // Worker task is gone; free the slot and keep scanning.
                    worker.release();
                    assignment = returned;
                }
            }
        }

        warn!(
            chain_id = %self.chain_id,
            request_id,
            job_index,
            "no idle worker, rejecting job"
        );
        let _ = reply.send(ExecutionEvent::Status {
            request_id,
            job_index,
            status: ExecutionStatus::FailedDueToNoAvailableWorker,
        });
        ExecutionStatus::FailedDueToNoAvailableWorker
    }

    /// Request cancellation on every worker (full-batch cancellation)
    pub fn cancel_all(&self) {
        for worker in &self.workers {
            worker.cancel();
        }
    }

    /// The pool's worker handles
    pub fn workers(&self) -> &[WorkerHandle] {
        &self.workers
    }

    /// Configured worker count
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Number of currently Idle workers
    pub fn idle_count(&self) -> usize {
        self.workers.iter().filter(|w| w.is_idle()).count()
    }

    /// Chain this pool executes for
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executive::{ChainContext, Executive};
    use fugue_scheduler::AccountTouchDetector;
    use fugue_types::{Address, Transaction, TransactionTrace};
    use tokio::sync::mpsc;

    struct EchoExecutive;

    impl Executive for EchoExecutive {
        fn apply(&self, tx: &Transaction, _ctx: &ChainContext) -> TransactionTrace {
            TransactionTrace::mined(tx.id(), Vec::<u8>::new())
        }
    }

    fn pool(size: usize) -> WorkerPool {
        let service = Arc::new(ServicePack::new(
            ChainId::new(1),
            Arc::new(EchoExecutive),
            Arc::new(AccountTouchDetector),
        ));
        WorkerPool::new(service, size)
    }

    fn job(seed: u8) -> ExecutionJob {
        ExecutionJob::new(vec![Transaction::transfer(
            Address::from_bytes([seed; 20]),
            Address::from_bytes([seed + 1; 20]),
            1,
        )])
    }

    #[tokio::test]
    async fn test_pool_starts_idle() {
        let pool = pool(3);
        assert_eq!(pool.size(), 3);
        assert_eq!(pool.idle_count(), 3);
        assert_eq!(pool.chain_id(), ChainId::new(1));
    }

    #[tokio::test]
    async fn test_dispatch_claims_a_worker() {
        let pool = pool(2);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let status = pool.dispatch(1, 0, job(1), &tx);
        assert_eq!(status, ExecutionStatus::Running);
        assert_eq!(pool.idle_count(), 1);

        // Admission reply arrives on the channel too.
        match rx.recv().await {
            Some(ExecutionEvent::Status { status, .. }) => {
                assert_eq!(status, ExecutionStatus::Running)
            }
            other => panic!("expected status event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_size_pool_rejects_everything() {
        let pool = pool(0);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let status = pool.dispatch(1, 0, job(1), &tx);
        assert_eq!(status, ExecutionStatus::FailedDueToNoAvailableWorker);
        match rx.recv().await {
            Some(ExecutionEvent::Status { status, .. }) => {
                assert_eq!(status, ExecutionStatus::FailedDueToNoAvailableWorker)
            }
            other => panic!("expected status event, got {other:?}"),
        }
    }
}
