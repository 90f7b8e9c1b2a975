//! Group and batch executors - concurrent job dispatch and aggregation

use crate::event::ExecutionEvent;
use crate::pool::WorkerPool;
use fugue_scheduler::{ConflictGrouper, ExecutionJob, ResourceUsageDetector};
use fugue_types::{ExecutionStatus, Transaction, TransactionId, TransactionTrace};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Reason string attached to traces of transactions whose job was
/// turned away by admission control.
pub const NO_WORKER_REASON: &str = "No available worker";

/// Terminal outcome of one dispatched job
#[derive(Clone, Debug)]
pub struct JobOutcome {
    /// Index of the job within its batch
    pub job_index: usize,
    /// Terminal status (`Completed` or `FailedDueToNoAvailableWorker`)
    pub status: ExecutionStatus,
}

/// Aggregated result of one batch run.
///
/// `traces` contains exactly one entry per input transaction: real
/// traces from workers, synthetic `Cancelled` traces for transactions
/// of rejected jobs. No cross-job ordering is promised; within a job,
/// traces appear in input order.
#[derive(Clone, Debug)]
pub struct BatchOutcome {
    /// Correlation token of the owning request
    pub request_id: u64,
    /// One trace per transaction
    pub traces: Vec<TransactionTrace>,
    /// One terminal outcome per job
    pub jobs: Vec<JobOutcome>,
}

impl BatchOutcome {
    /// Check if every job ran to completion (nothing rejected)
    pub fn is_fully_executed(&self) -> bool {
        self.jobs
            .iter()
            .all(|job| job.status == ExecutionStatus::Completed)
    }
}

/// Runs the conflict grouper over a batch and dispatches every
/// resulting job to the shared pool concurrently.
///
/// All jobs are submitted without waiting for prior jobs to finish;
/// the executor completes once every job reports a terminal status.
/// A rejected job is a per-job outcome and never blocks or fails its
/// siblings.
pub struct GroupExecutor {
    pool: Arc<WorkerPool>,
    grouper: ConflictGrouper,
}

impl GroupExecutor {
    /// Create a group executor over the given pool and conflict oracle
    pub fn new(pool: Arc<WorkerPool>, detector: Arc<dyn ResourceUsageDetector>) -> Self {
        Self {
            pool,
            grouper: ConflictGrouper::new(detector),
        }
    }

    /// Group the batch and run every job concurrently
    pub async fn execute(&self, request_id: u64, transactions: Vec<Transaction>) -> BatchOutcome {
        let jobs = self.grouper.group(transactions);
        self.execute_jobs(request_id, jobs).await
    }

    /// Dispatch pre-resolved jobs and aggregate one terminal outcome per
    /// job plus one trace per transaction.
    pub async fn execute_jobs(&self, request_id: u64, jobs: Vec<ExecutionJob>) -> BatchOutcome {
        let total = jobs.len();
        if total == 0 {
            return BatchOutcome {
                request_id,
                traces: Vec::new(),
                jobs: Vec::new(),
            };
        }

        let job_ids: Vec<Vec<TransactionId>> = jobs.iter().map(|job| job.tx_ids()).collect();
        let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();

        debug!(request_id, jobs = total, "dispatching job batch");
        for (job_index, job) in jobs.into_iter().enumerate() {
            self.pool.dispatch(request_id, job_index, job, &reply_tx);
        }
        drop(reply_tx);

        let mut traces = Vec::new();
        let mut outcomes: Vec<Option<ExecutionStatus>> = vec![None; total];
        let mut terminal = 0usize;

        while terminal < total {
            let Some(event) = reply_rx.recv().await else {
                break;
            };
            match event {
                ExecutionEvent::Trace { trace, .. } => traces.push(trace),
                ExecutionEvent::Status {
                    job_index, status, ..
                } if status.is_terminal() => {
                    if outcomes[job_index].is_none() {
                        if status == ExecutionStatus::FailedDueToNoAvailableWorker {
                            // Keep the trace set complete for the caller.
                            for id in &job_ids[job_index] {
                                traces.push(TransactionTrace::cancelled(*id, NO_WORKER_REASON));
                            }
                        }
                        outcomes[job_index] = Some(status);
                        terminal += 1;
                    }
                }
                ExecutionEvent::Status { .. } => {}
            }
        }

        let jobs = outcomes
            .into_iter()
            .enumerate()
            .map(|(job_index, status)| JobOutcome {
                job_index,
                status: status.unwrap_or(ExecutionStatus::FailedDueToNoAvailableWorker),
            })
            .collect();

        debug!(request_id, traces = traces.len(), "job batch complete");
        BatchOutcome {
            request_id,
            traces,
            jobs,
        }
    }
}

/// How a batch's transaction list should be interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchMode {
    /// Run conflict analysis and dispatch one job per group
    Group,
    /// The caller asserts the list is one already-resolved sequential
    /// unit; skip grouping and dispatch it whole
    Job,
}

/// Configurable front door over [`GroupExecutor`].
///
/// Both modes converge on the same dispatch and aggregation path, so
/// callers see identical result shapes either way.
pub struct BatchExecutor {
    inner: GroupExecutor,
}

impl BatchExecutor {
    /// Create a batch executor over the given pool and conflict oracle
    pub fn new(pool: Arc<WorkerPool>, detector: Arc<dyn ResourceUsageDetector>) -> Self {
        Self {
            inner: GroupExecutor::new(pool, detector),
        }
    }

    /// Execute a transaction list in the chosen mode
    pub async fn execute(
        &self,
        request_id: u64,
        transactions: Vec<Transaction>,
        mode: BatchMode,
    ) -> BatchOutcome {
        match mode {
            BatchMode::Group => self.inner.execute(request_id, transactions).await,
            BatchMode::Job => {
                let jobs = if transactions.is_empty() {
                    Vec::new()
                } else {
                    vec![ExecutionJob::new(transactions)]
                };
                self.inner.execute_jobs(request_id, jobs).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executive::{ChainContext, Executive, ServicePack};
    use fugue_scheduler::AccountTouchDetector;
    use fugue_types::{Address, ChainId};

    struct EchoExecutive;

    impl Executive for EchoExecutive {
        fn apply(&self, tx: &Transaction, _ctx: &ChainContext) -> TransactionTrace {
            TransactionTrace::mined(tx.id(), Vec::<u8>::new())
        }
    }

    fn setup(workers: usize) -> (Arc<WorkerPool>, Arc<AccountTouchDetector>) {
        let detector = Arc::new(AccountTouchDetector);
        let service = Arc::new(ServicePack::new(
            ChainId::new(1),
            Arc::new(EchoExecutive),
            detector.clone(),
        ));
        (Arc::new(WorkerPool::new(service, workers)), detector)
    }

    fn transfer(a: u8, b: u8) -> Transaction {
        Transaction::transfer(Address::from_bytes([a; 20]), Address::from_bytes([b; 20]), 1)
    }

    #[tokio::test]
    async fn test_empty_batch_completes_immediately() {
        let (pool, detector) = setup(2);
        let executor = GroupExecutor::new(pool, detector);

        let outcome = executor.execute(1, Vec::new()).await;
        assert!(outcome.traces.is_empty());
        assert!(outcome.jobs.is_empty());
        assert!(outcome.is_fully_executed());
    }

    #[tokio::test]
    async fn test_group_mode_runs_independent_jobs() {
        let (pool, detector) = setup(4);
        let executor = GroupExecutor::new(pool, detector);

        let txs = vec![transfer(1, 2), transfer(3, 4), transfer(5, 6)];
        let outcome = executor.execute(1, txs).await;

        assert_eq!(outcome.jobs.len(), 3);
        assert_eq!(outcome.traces.len(), 3);
        assert!(outcome.is_fully_executed());
    }

    #[tokio::test]
    async fn test_job_mode_skips_grouping() {
        let (pool, detector) = setup(4);
        let executor = BatchExecutor::new(pool, detector);

        // Three independent transactions; Job mode still runs them as
        // one sequential unit.
        let txs = vec![transfer(1, 2), transfer(3, 4), transfer(5, 6)];
        let expected: Vec<_> = txs.iter().map(|tx| tx.id()).collect();
        let outcome = executor.execute(1, txs, BatchMode::Job).await;

        assert_eq!(outcome.jobs.len(), 1);
        let got: Vec<_> = outcome.traces.iter().map(|t| t.tx_id).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_job_mode_with_empty_input() {
        let (pool, detector) = setup(1);
        let executor = BatchExecutor::new(pool, detector);

        let outcome = executor.execute(1, Vec::new(), BatchMode::Job).await;
        assert!(outcome.jobs.is_empty());
        assert!(outcome.traces.is_empty());
    }
}
