//! Structured transaction filters.
//!
//! A [`TransactionFilter`] is a set of independent, optional predicates.
//! An absent field imposes no constraint; present fields are combined with
//! logical AND. Applying a filter never fails and never reorders.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::model::{Transaction, parse_iso_date};

/// Field names as they appear in model output and JSON renderings.
pub const FILTER_FIELDS: &[&str] = &[
    "textSearch",
    "category",
    "minAmount",
    "maxAmount",
    "startDate",
    "endDate",
];

/// Criteria for narrowing a transaction list. Built fresh per search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Case-insensitive substring of the title or notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_search: Option<String>,
    /// Case-insensitive exact category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Inclusive lower bound on the signed amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    /// Inclusive upper bound on the signed amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    /// Inclusive first calendar day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive last calendar day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    /// A filter with no constraints. Matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text_search(mut self, term: impl Into<String>) -> Self {
        self.text_search = Some(term.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn min_amount(mut self, amount: f64) -> Self {
        self.min_amount = Some(amount);
        self
    }

    #[must_use]
    pub fn max_amount(mut self, amount: f64) -> Self {
        self.max_amount = Some(amount);
        self
    }

    #[must_use]
    pub fn start_date(mut self, day: NaiveDate) -> Self {
        self.start_date = Some(day);
        self
    }

    #[must_use]
    pub fn end_date(mut self, day: NaiveDate) -> Self {
        self.end_date = Some(day);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.text_search.is_none()
            && self.category.is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Validate a JSON object against the filter schema.
    ///
    /// Every key must be one of [`FILTER_FIELDS`]. `null` and blank strings
    /// mean the field was not extracted. Present strings are trimmed of
    /// surrounding whitespace, so `" Food "` filters on `Food`. Anything else
    /// of the wrong type or format is rejected, never coerced.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let Value::Object(object) = value else {
            return Err(ValidationError::new(
                "filter",
                format!("expected a JSON object, got {}", json_kind(value)),
            ));
        };

        if let Some(unknown) = object.keys().find(|k| !FILTER_FIELDS.contains(&k.as_str())) {
            return Err(ValidationError::new(
                unknown.as_str(),
                "is not a recognized filter field",
            ));
        }

        let start_date = string_field(object, "startDate")?
            .map(|s| parse_iso_date("startDate", &s))
            .transpose()?;
        let end_date = string_field(object, "endDate")?
            .map(|s| parse_iso_date("endDate", &s))
            .transpose()?;

        Ok(Self {
            text_search: string_field(object, "textSearch")?,
            category: string_field(object, "category")?,
            min_amount: number_field(object, "minAmount")?,
            max_amount: number_field(object, "maxAmount")?,
            start_date,
            end_date,
        })
    }

    /// Whether a single transaction satisfies every present predicate.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        Matcher::new(self).matches(transaction)
    }
}

/// Return the transactions that satisfy `filter`, in input order.
pub fn apply_filter(transactions: &[Transaction], filter: &TransactionFilter) -> Vec<Transaction> {
    if filter.is_empty() {
        return transactions.to_vec();
    }
    let matcher = Matcher::new(filter);
    transactions
        .iter()
        .filter(|t| matcher.matches(t))
        .cloned()
        .collect()
}

/// A filter with its text terms lowercased once up front.
struct Matcher<'a> {
    filter: &'a TransactionFilter,
    text: Option<String>,
    category: Option<String>,
}

impl<'a> Matcher<'a> {
    fn new(filter: &'a TransactionFilter) -> Self {
        Self {
            filter,
            text: filter.text_search.as_deref().map(str::to_lowercase),
            category: filter.category.as_deref().map(str::to_lowercase),
        }
    }

    fn matches(&self, t: &Transaction) -> bool {
        if let Some(term) = &self.text {
            let in_title = t.title.to_lowercase().contains(term.as_str());
            let in_notes = t
                .notes
                .as_deref()
                .is_some_and(|notes| notes.to_lowercase().contains(term.as_str()));
            if !in_title && !in_notes {
                return false;
            }
        }

        if self
            .category
            .as_ref()
            .is_some_and(|category| t.category.to_lowercase() != *category)
        {
            return false;
        }

        if self.filter.min_amount.is_some_and(|min| t.amount < min) {
            return false;
        }
        if self.filter.max_amount.is_some_and(|max| t.amount > max) {
            return false;
        }

        let day = t.date.day();
        if self.filter.start_date.is_some_and(|start| day < start) {
            return false;
        }
        if self.filter.end_date.is_some_and(|end| day > end) {
            return false;
        }

        true
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<Option<String>, ValidationError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(ValidationError::new(
            key,
            format!("expected a string, got {}", json_kind(other)),
        )),
    }
}

fn number_field(object: &Map<String, Value>, key: &str) -> Result<Option<f64>, ValidationError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| ValidationError::new(key, format!("{n} is not a finite number"))),
        Some(other) => Err(ValidationError::new(
            key,
            format!("expected a number, got {}", json_kind(other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_json_reads_every_field() {
        let filter = TransactionFilter::from_json(&json!({
            "textSearch": "coffee",
            "category": "Food",
            "minAmount": -20,
            "maxAmount": 0.5,
            "startDate": "2024-07-01",
            "endDate": "2024-07-31",
        }))
        .unwrap();

        assert_eq!(
            filter,
            TransactionFilter::new()
                .text_search("coffee")
                .category("Food")
                .min_amount(-20.0)
                .max_amount(0.5)
                .start_date(day(2024, 7, 1))
                .end_date(day(2024, 7, 31))
        );
    }

    #[test]
    fn from_json_treats_null_and_blank_as_absent() {
        let filter = TransactionFilter::from_json(&json!({
            "textSearch": "  ",
            "category": null,
            "minAmount": null,
        }))
        .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn from_json_trims_present_strings() {
        let filter = TransactionFilter::from_json(&json!({
            "textSearch": " coffee ",
            "category": "\tDining Out\n",
            "startDate": " 2024-07-01 ",
        }))
        .unwrap();
        assert_eq!(
            filter,
            TransactionFilter::new()
                .text_search("coffee")
                .category("Dining Out")
                .start_date(day(2024, 7, 1))
        );
    }

    #[test]
    fn from_json_rejects_wrong_types() {
        let err = TransactionFilter::from_json(&json!({ "minAmount": "50" })).unwrap_err();
        assert_eq!(err.field, "minAmount");

        let err = TransactionFilter::from_json(&json!({ "category": ["Food"] })).unwrap_err();
        assert_eq!(err.field, "category");
    }

    #[test]
    fn from_json_rejects_relative_and_loose_dates() {
        let err = TransactionFilter::from_json(&json!({ "startDate": "last month" })).unwrap_err();
        assert_eq!(err.field, "startDate");

        let err =
            TransactionFilter::from_json(&json!({ "endDate": "2024-07-28T10:00:00Z" })).unwrap_err();
        assert_eq!(err.field, "endDate");
    }

    #[test]
    fn from_json_rejects_unknown_fields_and_non_objects() {
        let err = TransactionFilter::from_json(&json!({ "merchant": "FreshMart" })).unwrap_err();
        assert_eq!(err.field, "merchant");

        assert!(TransactionFilter::from_json(&json!(["Food"])).is_err());
    }

    #[test]
    fn serializes_only_present_fields() {
        let filter = TransactionFilter::new().category("Food").start_date(day(2024, 7, 1));
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "category": "Food", "startDate": "2024-07-01" })
        );
    }
}
