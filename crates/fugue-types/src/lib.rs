//! # fugue-types
//!
//! Shared types for the fugue parallel-execution core.
//!
//! This crate provides:
//! - [`Transaction`](transaction::Transaction) - Immutable, content-addressed transactions
//! - [`ResourceKey`](resource::ResourceKey) - Opaque tokens for contended ledger state
//! - [`TransactionTrace`](trace::TransactionTrace) - Per-transaction execution outcomes
//! - Protocol message shapes for the executor request/response flow

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod message;
pub mod primitives;
pub mod resource;
pub mod trace;
pub mod transaction;

// Re-export commonly used types
pub use message::{ExecutionRequest, ExecutionResponse, ExecutionStatus, ResponseStatus};
pub use primitives::{Address, ChainId, TransactionId};
pub use resource::ResourceKey;
pub use trace::{TraceStatus, TransactionTrace};
pub use transaction::Transaction;
