//! Execution jobs - the strictly-sequential unit of work

use fugue_types::{Transaction, TransactionId};

/// One conflict group's transactions in their original relative order.
///
/// Invariant: a job's transactions execute strictly sequentially and in
/// this order; no two transactions from the same job ever run
/// concurrently.
#[derive(Clone, Debug, Default)]
pub struct ExecutionJob {
    /// Transactions in original input order
    pub transactions: Vec<Transaction>,
}

impl ExecutionJob {
    /// Create a job from an ordered transaction list
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Number of transactions in the job
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Check if the job is empty
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Identities of the job's transactions, in job order
    pub fn tx_ids(&self) -> Vec<TransactionId> {
        self.transactions.iter().map(|tx| tx.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fugue_types::Address;

    #[test]
    fn test_job_accessors() {
        let tx = Transaction::transfer(
            Address::from_bytes([1; 20]),
            Address::from_bytes([2; 20]),
            5,
        );
        let job = ExecutionJob::new(vec![tx.clone()]);

        assert_eq!(job.len(), 1);
        assert!(!job.is_empty());
        assert_eq!(job.tx_ids(), vec![tx.id()]);
        assert!(ExecutionJob::default().is_empty());
    }
}
