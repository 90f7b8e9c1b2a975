//! # fugue-executor
//!
//! Hierarchical parallel dispatch for the fugue execution core.
//!
//! The flow, bottom-up:
//! - [`Worker`](worker::WorkerHandle) - one execution slot running a job
//!   strictly sequentially with cooperative cancellation
//! - [`WorkerPool`] - fixed worker set with admission control (reject,
//!   never queue)
//! - [`GroupExecutor`] / [`BatchExecutor`] - conflict-group an incoming
//!   batch, dispatch every job concurrently, aggregate results
//! - [`ChainExecutor`] - per-chain coordinator producing exactly one
//!   correlated, input-ordered response per request
//! - [`ChainRegistry`] - process-wide chain id to executor map
//! - [`ChainRequestor`] / [`GeneralRequestor`] - call/await bridge over
//!   the message protocol

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod chain;
pub mod error;
pub mod event;
pub mod executive;
pub mod pool;
pub mod registry;
pub mod requestor;
pub mod worker;

pub use batch::{BatchExecutor, BatchMode, BatchOutcome, GroupExecutor, JobOutcome, NO_WORKER_REASON};
pub use chain::ChainExecutor;
pub use error::{ExecutorError, ExecutorResult};
pub use event::{EventReceiver, EventSender, ExecutionEvent};
pub use executive::{ChainContext, Executive, ServicePack};
pub use pool::WorkerPool;
pub use registry::{ChainHandle, ChainRegistry, RemoveChainStatus};
pub use requestor::{ChainRequestor, GeneralRequestor};
pub use worker::{JobAssignment, WorkerHandle, CANCELLED_REASON};
