//! Dashboard figures: totals and the per-category expense breakdown.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::Transaction;

/// Category used for expenses with a blank category.
const UNCATEGORIZED: &str = "Other";

/// Income, expenses, and their net over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of positive amounts.
    pub income: f64,
    /// Sum of negative amounts. Zero or negative.
    pub expenses: f64,
    /// `income + expenses`.
    pub net: f64,
}

impl Summary {
    pub fn of(transactions: &[Transaction]) -> Self {
        let income: f64 = transactions
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum();
        let expenses: f64 = transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum();
        Self {
            income,
            expenses,
            net: income + expenses,
        }
    }
}

/// Total spent in one category, as a positive number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Expenses grouped by category, largest total first, ties by name.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        let category = match t.category.trim() {
            "" => UNCATEGORIZED,
            name => name,
        };
        *totals.entry(category).or_default() += t.amount.abs();
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}
