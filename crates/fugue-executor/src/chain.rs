//! Per-chain execution coordinator

use crate::batch::{BatchExecutor, BatchMode};
use crate::executive::ServicePack;
use crate::pool::WorkerPool;
use fugue_types::{
    ChainId, ExecutionRequest, ExecutionResponse, ResponseStatus, TransactionId, TransactionTrace,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-chain coordinator: one Group-mode batch run per request, one
/// correlated reply per request.
///
/// The reply presents results in the caller's original transaction
/// order regardless of internal grouping or completion order. All
/// per-request state lives on the stack of `execute_transactions`, so
/// concurrent requests against the same chain never share coordinator
/// state.
pub struct ChainExecutor {
    chain_id: ChainId,
    pool: Arc<WorkerPool>,
    batch: BatchExecutor,
}

impl ChainExecutor {
    /// Build the executor and its worker pool for one chain
    pub fn new(service: Arc<ServicePack>, worker_count: usize) -> Self {
        let chain_id = service.context.chain_id;
        let detector = service.detector.clone();
        let pool = Arc::new(WorkerPool::new(service, worker_count));
        let batch = BatchExecutor::new(pool.clone(), detector);
        Self {
            chain_id,
            pool,
            batch,
        }
    }

    /// Chain this executor coordinates
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// The chain's worker pool (cancellation and introspection)
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Execute a correlated request and produce its single reply.
    ///
    /// The response carries exactly one trace per requested transaction,
    /// re-ordered to the request's input order. Status is `Executed`
    /// unless admission control turned a job away, in which case the
    /// affected transactions carry synthetic `Cancelled` traces and the
    /// overall status is `Rejected`.
    pub async fn execute_transactions(&self, request: ExecutionRequest) -> ExecutionResponse {
        let request_id = request.request_id;
        let input_ids: Vec<TransactionId> =
            request.transactions.iter().map(|tx| tx.id()).collect();
        debug!(
            chain_id = %self.chain_id,
            request_id,
            transactions = input_ids.len(),
            "executing request"
        );

        // Positions per id; duplicates map to successive slots.
        let mut positions: HashMap<TransactionId, VecDeque<usize>> = HashMap::new();
        for (index, id) in input_ids.iter().enumerate() {
            positions.entry(*id).or_default().push_back(index);
        }

        let outcome = self
            .batch
            .execute(request_id, request.transactions, BatchMode::Group)
            .await;

        let status = if outcome.is_fully_executed() {
            ResponseStatus::Executed
        } else {
            ResponseStatus::Rejected
        };

        let mut slots: Vec<Option<TransactionTrace>> = vec![None; input_ids.len()];
        for trace in outcome.traces {
            match positions.get_mut(&trace.tx_id).and_then(VecDeque::pop_front) {
                Some(position) => slots[position] = Some(trace),
                None => warn!(
                    chain_id = %self.chain_id,
                    request_id,
                    tx_id = %trace.tx_id,
                    "dropping trace with no matching request transaction"
                ),
            }
        }

        let results = slots
            .into_iter()
            .zip(input_ids)
            .map(|(slot, id)| {
                slot.unwrap_or_else(|| TransactionTrace::cancelled(id, "No trace produced"))
            })
            .collect();

        ExecutionResponse {
            request_id,
            status,
            results,
        }
    }
}
