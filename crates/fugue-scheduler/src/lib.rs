//! # fugue-scheduler
//!
//! Conflict grouping for the fugue parallel-execution core.
//!
//! Given an unordered batch of transactions, this crate partitions them
//! into independent [`ExecutionJob`]s: transactions that (transitively)
//! share a [`ResourceKey`](fugue_types::ResourceKey) land in the same
//! job and must run sequentially; transactions in different jobs share
//! no resources and may run concurrently.
//!
//! Features:
//! - [`ResourceUsageDetector`] capability trait (the conflict oracle)
//! - Union-find connected-component grouping
//! - Stable input order within every job

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod detector;
pub mod grouper;
pub mod job;

pub use detector::{AccountTouchDetector, ResourceUsageDetector};
pub use grouper::ConflictGrouper;
pub use job::ExecutionJob;
