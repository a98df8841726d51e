//! In-memory transaction store.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result, ValidationError};
use crate::model::{
    NewTransaction, Transaction, TransactionDate, TransactionId, TransactionUpdate,
    validate_fields,
};
use crate::store::TransactionStore;

/// Store backed by a `Vec` behind a lock, shareable between tasks.
///
/// New transactions go to the front, so among equal timestamps the most
/// recently created sorts first.
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `transactions`, kept in the given order.
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: RwLock::new(transactions),
        }
    }

    /// Store holding [`demo_transactions`].
    pub fn demo() -> Self {
        Self::with_transactions(demo_transactions())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Transaction>>> {
        self.transactions
            .read()
            .map_err(|_| Error::Other("transaction store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Transaction>>> {
        self.transactions
            .write()
            .map_err(|_| Error::Other("transaction store lock poisoned".to_string()))
    }
}

impl TransactionStore for MemoryStore {
    fn list(&self) -> Result<Vec<Transaction>> {
        let mut all = self.read()?.clone();
        // sort_by is stable, so equal timestamps keep store order
        all.sort_by(|a, b| b.date.timestamp().cmp(&a.date.timestamp()));
        Ok(all)
    }

    fn page(&self, page: usize, limit: usize) -> Result<Vec<Transaction>> {
        if page == 0 {
            return Err(ValidationError::new("page", "pages start at 1").into());
        }
        if limit == 0 {
            return Err(ValidationError::new("limit", "must be at least 1").into());
        }
        Ok(self
            .list()?
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect())
    }

    fn get(&self, id: &TransactionId) -> Result<Transaction> {
        self.read()?
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn create(&self, new: NewTransaction) -> Result<Transaction> {
        validate_fields(&new.title, new.amount, &new.category)?;

        let transaction = Transaction {
            id: TransactionId::new(),
            title: new.title.trim().to_string(),
            amount: new.amount,
            category: new.category.trim().to_string(),
            date: new.date,
            notes: new.notes.filter(|n| !n.trim().is_empty()),
        };
        self.write()?.insert(0, transaction.clone());

        tracing::info!(id = %transaction.id, "transaction created");
        Ok(transaction)
    }

    fn update(&self, id: &TransactionId, update: TransactionUpdate) -> Result<Transaction> {
        let mut transactions = self.write()?;
        let slot = transactions
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut updated = slot.clone();
        if let Some(title) = update.title {
            updated.title = title.trim().to_string();
        }
        if let Some(amount) = update.amount {
            updated.amount = amount;
        }
        if let Some(category) = update.category {
            updated.category = category.trim().to_string();
        }
        if let Some(date) = update.date {
            updated.date = date;
        }
        if let Some(notes) = update.notes {
            updated.notes = notes.filter(|n| !n.trim().is_empty());
        }
        validate_fields(&updated.title, updated.amount, &updated.category)?;

        *slot = updated.clone();
        tracing::info!(%id, "transaction updated");
        Ok(updated)
    }

    fn delete(&self, id: &TransactionId) -> Result<()> {
        let mut transactions = self.write()?;
        let before = transactions.len();
        transactions.retain(|t| &t.id != id);
        if transactions.len() == before {
            return Err(Error::NotFound(id.to_string()));
        }
        tracing::info!(%id, "transaction deleted");
        Ok(())
    }
}

/// Sample ledger used by the CLI when no ledger file is given.
pub fn demo_transactions() -> Vec<Transaction> {
    DEMO_ROWS
        .into_iter()
        .map(|(id, title, amount, category, at, notes)| Transaction {
            id: id.into(),
            title: title.to_string(),
            amount,
            category: category.to_string(),
            date: TransactionDate::Instant(at.and_utc().fixed_offset()),
            notes: notes.map(str::to_string),
        })
        .collect()
}

type DemoRow = (&'static str, &'static str, f64, &'static str, NaiveDateTime, Option<&'static str>);

#[rustfmt::skip]
const DEMO_ROWS: [DemoRow; 10] = [
    ("txn_1", "Grocery Shopping at FreshMart", -75.50, "Groceries", utc(2024, 7, 28, 10, 0), Some("Weekly groceries")),
    ("txn_2", "Monthly Salary", 3500.00, "Income", utc(2024, 7, 25, 9, 0), Some("July Salary")),
    ("txn_3", "Dinner at The Italian Place", -55.00, "Dining Out", utc(2024, 7, 26, 19, 30), None),
    ("txn_4", "Netflix Subscription", -15.99, "Subscriptions", utc(2024, 7, 20, 12, 0), Some("Monthly plan")),
    ("txn_5", "Train ticket to City Center", -5.50, "Transport", utc(2024, 7, 22, 8, 15), None),
    ("txn_6", "New T-shirt from StyleCo", -29.99, "Shopping", utc(2024, 7, 21, 15, 45), None),
    ("txn_7", "Electricity Bill", -65.20, "Bills", utc(2024, 7, 18, 11, 0), Some("For June")),
    ("txn_8", "Coffee with a friend", -8.75, "Food", utc(2024, 7, 27, 14, 0), None),
    ("txn_9", "Freelance Project Payment", 500.00, "Income", utc(2024, 7, 15, 18, 0), None),
    ("txn_10", "Cinema Tickets: 'The Last Stand'", -25.00, "Entertainment", utc(2024, 7, 19, 20, 0), None),
];

/// Evaluated at compile time, so a bad demo date fails the build.
const fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        panic!("invalid demo date");
    };
    let Some(at) = date.and_hms_opt(hour, minute, 0) else {
        panic!("invalid demo time");
    };
    at
}
