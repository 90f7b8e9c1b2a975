//! Worker - a single sequential execution slot

use crate::event::{EventSender, ExecutionEvent};
use crate::executive::ServicePack;
use fugue_scheduler::ExecutionJob;
use fugue_types::{ExecutionStatus, TransactionTrace};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Reason string attached to traces of transactions a cancellation
/// prevented from running.
pub const CANCELLED_REASON: &str = "Execution Cancelled";

/// A job handed to a worker, with the channel its events flow back on
#[derive(Debug)]
pub struct JobAssignment {
    /// Correlation token of the owning request
    pub request_id: u64,
    /// Index of the job within its batch
    pub job_index: usize,
    /// The transactions to run, strictly in order
    pub job: ExecutionJob,
    /// Reply channel for status and trace events
    pub reply: EventSender,
}

/// Handle to one worker slot.
///
/// The slot's Idle/Busy flag is the admission-control state: `try_reserve`
/// flips it with a compare-and-swap, and the worker task flips it back
/// only after reporting a terminal status. A worker never receives a
/// second job while Busy.
#[derive(Clone)]
pub struct WorkerHandle {
    id: usize,
    busy: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
    current: Arc<Mutex<Option<u64>>>,
    last_completed: Arc<Mutex<Option<u64>>>,
    jobs: mpsc::UnboundedSender<JobAssignment>,
}

impl WorkerHandle {
    /// Spawn a worker task bound to the given chain services and return
    /// its handle.
    pub fn spawn(id: usize, service: Arc<ServicePack>) -> Self {
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let busy = Arc::new(AtomicBool::new(false));
        let cancel = Arc::new(AtomicBool::new(false));
        let current = Arc::new(Mutex::new(None));
        let last_completed = Arc::new(Mutex::new(None));

        let worker = Worker {
            id,
            service,
            busy: busy.clone(),
            cancel: cancel.clone(),
            current: current.clone(),
            last_completed: last_completed.clone(),
            jobs: job_rx,
        };
        tokio::spawn(worker.run());

        Self {
            id,
            busy,
            cancel,
            current,
            last_completed,
            jobs: job_tx,
        }
    }

    /// Worker slot identity
    pub fn id(&self) -> usize {
        self.id
    }

    /// Check if the slot is Idle
    pub fn is_idle(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    /// Atomically claim the slot (Idle -> Busy).
    ///
    /// Returns false if the worker is already Busy. A successful claim
    /// clears any cancellation left over from the previous job.
    pub fn try_reserve(&self) -> bool {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.cancel.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Release a claimed slot without running a job (assignment failed)
    pub(crate) fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Hand a job to a reserved worker.
    ///
    /// Returns the assignment back if the worker task is gone.
    pub fn assign(&self, assignment: JobAssignment) -> Result<(), JobAssignment> {
        self.jobs.send(assignment).map_err(|err| err.0)
    }

    /// Request cooperative cancellation of the in-flight job.
    ///
    /// The worker observes the signal between transactions; the current
    /// transaction always finishes. A cancel against an Idle worker is
    /// a no-op.
    pub fn cancel(&self) {
        if self.busy.load(Ordering::Acquire) {
            debug!(worker = self.id, "cancellation requested");
            self.cancel.store(true, Ordering::Release);
        }
    }

    /// Query the worker's status for a request.
    ///
    /// Only the in-flight job and the most recently completed one are
    /// tracked; anything else answers `InvalidRequestId` rather than
    /// stale data.
    pub fn query_status(&self, request_id: u64) -> ExecutionStatus {
        if *self.current.lock() == Some(request_id) {
            return ExecutionStatus::Running;
        }
        if *self.last_completed.lock() == Some(request_id) {
            return ExecutionStatus::Completed;
        }
        ExecutionStatus::InvalidRequestId
    }
}

/// The spawned side of a worker slot
struct Worker {
    id: usize,
    service: Arc<ServicePack>,
    busy: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
    current: Arc<Mutex<Option<u64>>>,
    last_completed: Arc<Mutex<Option<u64>>>,
    jobs: mpsc::UnboundedReceiver<JobAssignment>,
}

impl Worker {
    async fn run(mut self) {
        while let Some(assignment) = self.jobs.recv().await {
            self.run_job(assignment);
        }
        trace!(worker = self.id, "worker channel closed, exiting");
    }

    /// Run one job end-to-end: strictly sequential, one trace per
    /// transaction, cancellation checked before each start.
    fn run_job(&self, assignment: JobAssignment) {
        let JobAssignment {
            request_id,
            job_index,
            job,
            reply,
        } = assignment;

        *self.current.lock() = Some(request_id);
        debug!(
            worker = self.id,
            request_id,
            job_index,
            transactions = job.len(),
            "job started"
        );

        let mut cancelled_from = None;
        for (index, tx) in job.transactions.iter().enumerate() {
            if self.cancel.load(Ordering::Acquire) {
                cancelled_from = Some(index);
                break;
            }
            if index == 0 {
                let _ = reply.send(ExecutionEvent::Status {
                    request_id,
                    job_index,
                    status: ExecutionStatus::Running,
                });
            }
            let trace = self.service.executive.apply(tx, &self.service.context);
            let _ = reply.send(ExecutionEvent::Trace {
                request_id,
                job_index,
                trace,
            });
        }

        // Every not-yet-started transaction still gets a terminal trace.
        if let Some(from) = cancelled_from {
            debug!(
                worker = self.id,
                request_id,
                job_index,
                skipped = job.len() - from,
                "job cancelled"
            );
            for tx in &job.transactions[from..] {
                let _ = reply.send(ExecutionEvent::Trace {
                    request_id,
                    job_index,
                    trace: TransactionTrace::cancelled(tx.id(), CANCELLED_REASON),
                });
            }
        }

        self.cancel.store(false, Ordering::Release);
        *self.current.lock() = None;
        *self.last_completed.lock() = Some(request_id);
        // Cancellation is a completion variant, not an error channel.
        let _ = reply.send(ExecutionEvent::Status {
            request_id,
            job_index,
            status: ExecutionStatus::Completed,
        });
        self.busy.store(false, Ordering::Release);
    }
}
