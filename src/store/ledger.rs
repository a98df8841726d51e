//! TOML ledger files.
//!
//! A ledger is a list of `[[transaction]]` tables:
//!
//! ```toml
//! [[transaction]]
//! id = "txn_1"                  # optional, generated when missing
//! title = "Monthly Salary"
//! amount = 3500.0
//! category = "Income"
//! date = "2024-07-25T09:00:00Z" # or "2024-07-25T09:00:00" or "2024-07-25"
//! notes = "July Salary"         # optional
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{Transaction, TransactionDate, TransactionId, validate_fields};
use crate::store::MemoryStore;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LedgerFile {
    #[serde(default, rename = "transaction")]
    transactions: Vec<LedgerEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LedgerEntry {
    id: Option<TransactionId>,
    title: String,
    amount: f64,
    category: String,
    date: TransactionDate,
    notes: Option<String>,
}

/// Parse ledger text. Entries are validated like newly created transactions
/// and ids must be unique.
pub fn parse_ledger(content: &str) -> Result<Vec<Transaction>> {
    let file: LedgerFile =
        toml::from_str(content).map_err(|e| Error::Ledger(format!("bad ledger: {e}")))?;

    let mut seen = HashSet::new();
    let mut transactions = Vec::with_capacity(file.transactions.len());
    for (index, entry) in file.transactions.into_iter().enumerate() {
        validate_fields(&entry.title, entry.amount, &entry.category).map_err(|e| {
            Error::Ledger(format!("transaction #{}: {e}", index + 1))
        })?;

        let id = entry.id.unwrap_or_default();
        if !seen.insert(id.clone()) {
            return Err(Error::Ledger(format!("duplicate transaction id {id}")));
        }

        transactions.push(Transaction {
            id,
            title: entry.title.trim().to_string(),
            amount: entry.amount,
            category: entry.category.trim().to_string(),
            date: entry.date,
            notes: entry.notes.filter(|n| !n.trim().is_empty()),
        });
    }
    Ok(transactions)
}

/// Read a ledger file from disk.
pub fn load_ledger(path: &Path) -> Result<Vec<Transaction>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Ledger(format!("cannot read {}: {e}", path.display())))?;
    let transactions = parse_ledger(&content)?;
    tracing::debug!(path = %path.display(), count = transactions.len(), "ledger loaded");
    Ok(transactions)
}

impl MemoryStore {
    /// Store seeded from a ledger file, in file order.
    pub fn from_ledger(path: &Path) -> Result<Self> {
        Ok(Self::with_transactions(load_ledger(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_and_generates_missing_ids() {
        let ledger = parse_ledger(
            r#"
            [[transaction]]
            id = "txn_2"
            title = "Monthly Salary"
            amount = 3500
            category = "Income"
            date = "2024-07-25T09:00:00Z"
            notes = "July Salary"

            [[transaction]]
            title = "Coffee with a friend"
            amount = -8.75
            category = "Food"
            date = "2024-07-27"
            "#,
        )
        .unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].id.as_str(), "txn_2");
        assert_eq!(ledger[0].amount, 3500.0);
        assert!(ledger[1].id.as_str().starts_with("txn_"));
        assert_eq!(ledger[1].notes, None);
    }

    #[test]
    fn accepts_local_date_times() {
        let ledger = parse_ledger(
            r#"
            [[transaction]]
            title = "Grocery Shopping at FreshMart"
            amount = -75.5
            category = "Groceries"
            date = "2024-07-28T10:00:00"
            "#,
        )
        .unwrap();

        assert_eq!(ledger[0].date.to_string(), "2024-07-28T10:00:00");
        let filter = crate::model::filter::TransactionFilter::new()
            .start_date(ledger[0].date.day())
            .end_date(ledger[0].date.day());
        assert_eq!(crate::model::filter::apply_filter(&ledger, &filter).len(), 1);
    }

    #[test]
    fn empty_ledger_is_allowed() {
        assert!(parse_ledger("").unwrap().is_empty());
    }

    #[test]
    fn rejects_zero_amounts_duplicates_and_bad_dates() {
        let zero = r#"
            [[transaction]]
            title = "Nothing"
            amount = 0.0
            category = "Other"
            date = "2024-07-27"
        "#;
        assert!(matches!(parse_ledger(zero), Err(Error::Ledger(_))));

        let dup = r#"
            [[transaction]]
            id = "a"
            title = "One"
            amount = 1.0
            category = "Other"
            date = "2024-07-27"

            [[transaction]]
            id = "a"
            title = "Two"
            amount = 2.0
            category = "Other"
            date = "2024-07-27"
        "#;
        assert!(matches!(parse_ledger(dup), Err(Error::Ledger(_))));

        let bad_date = r#"
            [[transaction]]
            title = "Coffee"
            amount = -3.0
            category = "Food"
            date = "last tuesday"
        "#;
        assert!(matches!(parse_ledger(bad_date), Err(Error::Ledger(_))));
    }
}
