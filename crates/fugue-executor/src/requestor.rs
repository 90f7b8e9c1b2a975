//! Requestor adaptors - call/await bridge over the message protocol

use crate::chain::ChainExecutor;
use crate::error::{ExecutorError, ExecutorResult};
use crate::registry::{ChainHandle, ChainRegistry};
use fugue_types::{ChainId, ExecutionRequest, ExecutionResponse, Transaction};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::trace;

/// Run one correlated request against a chain executor and await its
/// single reply. A reply carrying a different request id than the one
/// issued is refused, guarding against cross-talk between concurrent
/// outstanding requests.
async fn request(
    executor: Arc<ChainExecutor>,
    request: ExecutionRequest,
) -> ExecutorResult<ExecutionResponse> {
    let request_id = request.request_id;
    let (reply_tx, reply_rx) = oneshot::channel();

    tokio::spawn(async move {
        let response = executor.execute_transactions(request).await;
        let _ = reply_tx.send(response);
    });

    let response = reply_rx
        .await
        .map_err(|_| ExecutorError::ResponseDropped(request_id))?;
    if response.request_id != request_id {
        return Err(ExecutorError::CorrelationMismatch {
            expected: request_id,
            got: response.request_id,
        });
    }
    trace!(request_id, results = response.results.len(), "request resolved");
    Ok(response)
}

/// Call-style front end for a single chain
pub struct ChainRequestor {
    handle: ChainHandle,
    next_request_id: AtomicU64,
}

impl ChainRequestor {
    /// Create a requestor bound to one chain's executor
    pub fn new(handle: ChainHandle) -> Self {
        Self {
            handle,
            next_request_id: AtomicU64::new(1),
        }
    }

    /// The chain this requestor talks to
    pub fn chain_id(&self) -> ChainId {
        self.handle.chain_id
    }

    /// Execute a transaction batch and await the correlated response
    pub async fn execute_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> ExecutorResult<ExecutionResponse> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let req = ExecutionRequest::new(request_id, self.handle.chain_id, transactions);
        request(self.handle.executor.clone(), req).await
    }
}

/// Call-style front end over the whole registry
pub struct GeneralRequestor {
    registry: Arc<ChainRegistry>,
    next_request_id: AtomicU64,
}

impl GeneralRequestor {
    /// Create a requestor over a registry
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self {
            registry,
            next_request_id: AtomicU64::new(1),
        }
    }

    /// Resolve the chain and execute a transaction batch on it
    pub async fn execute_transactions(
        &self,
        chain_id: ChainId,
        transactions: Vec<Transaction>,
    ) -> ExecutorResult<ExecutionResponse> {
        let handle = self
            .registry
            .get_chain(chain_id)
            .ok_or(ExecutorError::ChainNotFound(chain_id))?;
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let req = ExecutionRequest::new(request_id, chain_id, transactions);
        request(handle.executor, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executive::{ChainContext, Executive, ServicePack};
    use fugue_scheduler::AccountTouchDetector;
    use fugue_types::{Address, ResponseStatus, TransactionTrace};

    struct EchoExecutive;

    impl Executive for EchoExecutive {
        fn apply(&self, tx: &Transaction, _ctx: &ChainContext) -> TransactionTrace {
            TransactionTrace::mined(tx.id(), Vec::<u8>::new())
        }
    }

    fn registry() -> Arc<ChainRegistry> {
        Arc::new(ChainRegistry::new(2))
    }

    fn service(chain: u32) -> Arc<ServicePack> {
        Arc::new(ServicePack::new(
            ChainId::new(chain),
            Arc::new(EchoExecutive),
            Arc::new(AccountTouchDetector),
        ))
    }

    fn transfer(a: u8, b: u8) -> Transaction {
        Transaction::transfer(Address::from_bytes([a; 20]), Address::from_bytes([b; 20]), 1)
    }

    #[tokio::test]
    async fn test_chain_requestor_round_trip() {
        let registry = registry();
        let handle = registry.add_chain(service(1));
        let requestor = ChainRequestor::new(handle);

        let txs = vec![transfer(1, 2), transfer(3, 4)];
        let response = requestor.execute_transactions(txs).await.unwrap();

        assert_eq!(response.status, ResponseStatus::Executed);
        assert_eq!(response.results.len(), 2);
    }

    #[tokio::test]
    async fn test_request_ids_increase_per_requestor() {
        let registry = registry();
        let requestor = ChainRequestor::new(registry.add_chain(service(1)));

        let first = requestor
            .execute_transactions(vec![transfer(1, 2)])
            .await
            .unwrap();
        let second = requestor
            .execute_transactions(vec![transfer(1, 2)])
            .await
            .unwrap();
        assert!(second.request_id > first.request_id);
    }

    #[tokio::test]
    async fn test_general_requestor_unknown_chain() {
        let requestor = GeneralRequestor::new(registry());

        let err = requestor
            .execute_transactions(ChainId::new(42), vec![transfer(1, 2)])
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::ChainNotFound(id) if id == ChainId::new(42)));
    }

    #[tokio::test]
    async fn test_general_requestor_routes_to_registered_chain() {
        let registry = registry();
        registry.add_chain(service(7));
        let requestor = GeneralRequestor::new(registry);

        let response = requestor
            .execute_transactions(ChainId::new(7), vec![transfer(1, 2)])
            .await
            .unwrap();
        assert_eq!(response.results.len(), 1);
    }
}
