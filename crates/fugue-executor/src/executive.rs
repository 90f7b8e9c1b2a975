//! External executive interface and per-chain service bundle

use fugue_scheduler::ResourceUsageDetector;
use fugue_types::{ChainId, Transaction, TransactionTrace};
use std::sync::Arc;

/// Execution context a worker hands to the executive for every call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainContext {
    /// Chain the transaction executes against
    pub chain_id: ChainId,
}

impl ChainContext {
    /// Create a context for the given chain
    pub fn new(chain_id: ChainId) -> Self {
        Self { chain_id }
    }
}

/// The ledger-execution backend.
///
/// Applies one transaction against chain state and produces its trace.
/// Synchronous by contract; may mutate ledger state as a side effect.
/// The dispatch engine guarantees that no two concurrently-running
/// calls touch the same resources, so implementations need no extra
/// locking for transaction-level state.
///
/// Internal failures (e.g. a contract revert) are reported inside the
/// returned trace, not by panicking: the engine treats them as opaque
/// payload.
pub trait Executive: Send + Sync {
    /// Apply one transaction relative to the chain context
    fn apply(&self, tx: &Transaction, ctx: &ChainContext) -> TransactionTrace;
}

/// Per-chain service bundle, injected once at chain registration.
///
/// Bundles the chain context, the executive, and the resource detector
/// a chain's workers and grouper operate with.
#[derive(Clone)]
pub struct ServicePack {
    /// Execution context for this chain
    pub context: ChainContext,
    /// Ledger-execution backend
    pub executive: Arc<dyn Executive>,
    /// Conflict oracle used for grouping
    pub detector: Arc<dyn ResourceUsageDetector>,
}

impl ServicePack {
    /// Bundle the services for one chain
    pub fn new(
        chain_id: ChainId,
        executive: Arc<dyn Executive>,
        detector: Arc<dyn ResourceUsageDetector>,
    ) -> Self {
        Self {
            context: ChainContext::new(chain_id),
            executive,
            detector,
        }
    }
}
