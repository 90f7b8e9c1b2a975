//! Conflict grouping via union-find connected components
//!
//! Two transactions belong to the same group when their resource sets
//! are connected, directly or transitively, by at least one shared key.
//! Groups form a partition of the input: every transaction appears in
//! exactly one job.

use crate::detector::ResourceUsageDetector;
use crate::job::ExecutionJob;
use fugue_types::{ResourceKey, Transaction};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Disjoint-set forest over transaction indices.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    /// Find the set representative with path compression
    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Union by rank
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Partitions transaction batches into independent execution jobs.
///
/// Complexity is O(T·R·α) for T transactions with R resources each,
/// where α is the inverse-Ackermann amortized union-find cost.
pub struct ConflictGrouper {
    detector: Arc<dyn ResourceUsageDetector>,
}

impl ConflictGrouper {
    /// Create a grouper backed by the given resource detector
    pub fn new(detector: Arc<dyn ResourceUsageDetector>) -> Self {
        Self { detector }
    }

    /// Partition `transactions` into maximal conflict groups.
    ///
    /// Each returned job keeps its transactions in their original
    /// relative order; jobs themselves are ordered by their earliest
    /// member. An empty input yields no jobs; a transaction touching no
    /// resources forms a singleton job.
    pub fn group(&self, transactions: Vec<Transaction>) -> Vec<ExecutionJob> {
        if transactions.is_empty() {
            return Vec::new();
        }

        let mut sets = UnionFind::new(transactions.len());
        // First transaction seen touching each key
        let mut first_owner: HashMap<ResourceKey, usize> = HashMap::new();

        for (index, tx) in transactions.iter().enumerate() {
            for key in self.detector.resources(tx) {
                match first_owner.get(&key) {
                    Some(&owner) => sets.union(owner, index),
                    None => {
                        first_owner.insert(key, index);
                    }
                }
            }
        }

        // Materialize groups, preserving input order within each and
        // ordering jobs by first member.
        let mut members: HashMap<usize, Vec<Transaction>> = HashMap::new();
        let mut root_order: Vec<usize> = Vec::new();
        for (index, tx) in transactions.into_iter().enumerate() {
            let root = sets.find(index);
            let group = members.entry(root).or_insert_with(|| {
                root_order.push(root);
                Vec::new()
            });
            group.push(tx);
        }

        let jobs: Vec<ExecutionJob> = root_order
            .into_iter()
            .filter_map(|root| members.remove(&root))
            .map(ExecutionJob::new)
            .collect();

        debug!(
            groups = jobs.len(),
            keys = first_owner.len(),
            "grouped transaction batch"
        );
        jobs
    }
}
