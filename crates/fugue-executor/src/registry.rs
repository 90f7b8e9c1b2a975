//! Process-wide chain registry

use crate::chain::ChainExecutor;
use crate::executive::ServicePack;
use dashmap::DashMap;
use fugue_types::ChainId;
use std::sync::Arc;
use tracing::info;

/// Live reference to one chain's executor
#[derive(Clone)]
pub struct ChainHandle {
    /// The chain this handle points at
    pub chain_id: ChainId,
    /// The chain's long-lived executor
    pub executor: Arc<ChainExecutor>,
}

/// Outcome of a [`ChainRegistry::remove_chain`] call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveChainStatus {
    /// The chain existed and its executor was torn down
    Removed,
    /// No such chain was registered (not an error)
    NotExisting,
}

/// Process-wide map from chain id to live executor.
///
/// At most one live handle exists per chain id. Registration is
/// idempotent: adding an already-registered chain returns the existing
/// handle without building a second executor. Misses are typed
/// outcomes, never panics.
pub struct ChainRegistry {
    chains: DashMap<ChainId, ChainHandle>,
    workers_per_chain: usize,
}

impl ChainRegistry {
    /// Create a registry; every added chain gets a pool of
    /// `workers_per_chain` workers.
    pub fn new(workers_per_chain: usize) -> Self {
        Self {
            chains: DashMap::new(),
            workers_per_chain,
        }
    }

    /// Register a chain, building its executor and worker pool from the
    /// given services. Returns the existing handle if the chain id is
    /// already registered.
    pub fn add_chain(&self, service: Arc<ServicePack>) -> ChainHandle {
        let chain_id = service.context.chain_id;
        self.chains
            .entry(chain_id)
            .or_insert_with(|| {
                info!(%chain_id, workers = self.workers_per_chain, "registering chain");
                ChainHandle {
                    chain_id,
                    executor: Arc::new(ChainExecutor::new(service, self.workers_per_chain)),
                }
            })
            .clone()
    }

    /// Look up a chain's handle
    pub fn get_chain(&self, chain_id: ChainId) -> Option<ChainHandle> {
        self.chains.get(&chain_id).map(|entry| entry.clone())
    }

    /// Tear down a chain's executor.
    ///
    /// Removing an absent chain is reported, not an error.
    pub fn remove_chain(&self, chain_id: ChainId) -> RemoveChainStatus {
        match self.chains.remove(&chain_id) {
            Some(_) => {
                info!(%chain_id, "chain removed");
                RemoveChainStatus::Removed
            }
            None => RemoveChainStatus::NotExisting,
        }
    }

    /// Number of registered chains
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }
}
