//! Transaction storage.
//!
//! [`TransactionStore`] is the CRUD contract callers are handed; the filter
//! core never sees it. [`MemoryStore`] keeps everything in memory and can be
//! seeded from a TOML ledger or the demo data set.

pub mod ledger;
pub mod memory;

use crate::error::Result;
use crate::model::{NewTransaction, Transaction, TransactionId, TransactionUpdate};

pub use memory::{MemoryStore, demo_transactions};

/// CRUD operations over a user's transactions.
pub trait TransactionStore: Send + Sync {
    /// All transactions, newest date first. Transactions on the same
    /// timestamp keep store order, most recently created first.
    fn list(&self) -> Result<Vec<Transaction>>;

    /// One 1-based page of [`list`](Self::list).
    fn page(&self, page: usize, limit: usize) -> Result<Vec<Transaction>>;

    fn get(&self, id: &TransactionId) -> Result<Transaction>;

    /// Validate and insert a new transaction under a fresh id.
    fn create(&self, new: NewTransaction) -> Result<Transaction>;

    /// Apply the present fields of `update`, re-validating the result.
    fn update(&self, id: &TransactionId, update: TransactionUpdate) -> Result<Transaction>;

    fn delete(&self, id: &TransactionId) -> Result<()>;
}
