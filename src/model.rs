//! Core data model.
//!
//! A transaction is a single recorded financial event. Negative amounts are
//! expenses, positive amounts are income. The filter types that narrow a set
//! of transactions live in [`filter`].

pub mod filter;

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A recorded income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    /// Signed amount. Never zero for transactions created through a store.
    pub amount: f64,
    pub category: String,
    pub date: TransactionDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }
}

/// Opaque transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh identifier of the form `txn_<uuid>`.
    pub fn new() -> Self {
        Self(format!("txn_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

/// When a transaction happened, as written in the source data.
///
/// A bare calendar date (`2024-07-28`), a local date-time without an offset
/// (`2024-07-28T10:00:00`), or an RFC 3339 timestamp
/// (`2024-07-28T10:00:00Z`). The original form is kept so it serializes
/// back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionDate {
    Day(NaiveDate),
    Local(NaiveDateTime),
    Instant(DateTime<FixedOffset>),
}

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

impl TransactionDate {
    /// The calendar day of the stored value. Time-of-day and offset are
    /// dropped, not converted: `2024-07-28T23:30:00-05:00` is the 28th.
    pub fn day(&self) -> NaiveDate {
        match self {
            TransactionDate::Day(day) => *day,
            TransactionDate::Local(local) => local.date(),
            TransactionDate::Instant(instant) => instant.date_naive(),
        }
    }

    /// A point in time for ordering. Bare dates count as midnight UTC and
    /// local date-times as UTC.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        match self {
            TransactionDate::Day(day) => day
                .and_time(NaiveTime::MIN)
                .and_utc()
                .fixed_offset(),
            TransactionDate::Local(local) => local.and_utc().fixed_offset(),
            TransactionDate::Instant(instant) => *instant,
        }
    }
}

impl From<NaiveDate> for TransactionDate {
    fn from(day: NaiveDate) -> Self {
        TransactionDate::Day(day)
    }
}

impl From<DateTime<FixedOffset>> for TransactionDate {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        TransactionDate::Instant(instant)
    }
}

impl FromStr for TransactionDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() == 10 {
            return parse_iso_date("date", s).map(TransactionDate::Day);
        }
        if let Ok(local) = NaiveDateTime::parse_from_str(s, LOCAL_FORMAT) {
            return Ok(TransactionDate::Local(local));
        }
        DateTime::parse_from_rfc3339(s)
            .map(TransactionDate::Instant)
            .map_err(|e| ValidationError::new("date", format!("{s:?} is not an ISO-8601 date: {e}")))
    }
}

impl std::fmt::Display for TransactionDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionDate::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            TransactionDate::Local(local) => write!(f, "{}", local.format(LOCAL_FORMAT)),
            TransactionDate::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
        }
    }
}

impl Serialize for TransactionDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransactionDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// chrono accepts unpadded fields (`2024-7-1`), so the shape is checked
/// before parsing.
pub fn parse_iso_date(field: &str, s: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(ValidationError::new(
            field,
            format!("{s:?} is not in YYYY-MM-DD form"),
        ));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| ValidationError::new(field, format!("{s:?} is not a calendar date: {e}")))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Default category vocabulary offered to users and to the suggestion prompt.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Utilities",
    "Entertainment",
    "Shopping",
    "Rent",
    "Salary",
    "Healthcare",
    "Education",
    "Groceries",
    "Dining Out",
    "Travel",
    "Bills",
    "Income",
    "Savings",
    "Investments",
    "Gifts",
    "Personal Care",
    "Technology",
    "Home Improvement",
    "Subscriptions",
    "Other",
];

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Payload for creating a transaction. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub(crate) title: String,
    pub(crate) amount: f64,
    pub(crate) category: String,
    pub(crate) date: TransactionDate,
    pub(crate) notes: Option<String>,
}

impl NewTransaction {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<TransactionDate>,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            category: category.into(),
            date: date.into(),
            notes: None,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update. Absent fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub(crate) title: Option<String>,
    pub(crate) amount: Option<f64>,
    pub(crate) category: Option<String>,
    pub(crate) date: Option<TransactionDate>,
    /// `Some(None)` clears the notes.
    pub(crate) notes: Option<Option<String>>,
}

impl TransactionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: impl Into<TransactionDate>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(Some(notes.into()));
        self
    }

    pub fn clear_notes(mut self) -> Self {
        self.notes = Some(None);
        self
    }
}

/// Check the fields a store requires before accepting a transaction.
pub(crate) fn validate_fields(
    title: &str,
    amount: f64,
    category: &str,
) -> Result<(), ValidationError> {
    if title.trim().chars().count() < 2 {
        return Err(ValidationError::new(
            "title",
            "must be at least 2 characters",
        ));
    }
    if !amount.is_finite() {
        return Err(ValidationError::new("amount", "must be a finite number"));
    }
    if amount == 0.0 {
        return Err(ValidationError::new("amount", "cannot be zero"));
    }
    if category.trim().is_empty() {
        return Err(ValidationError::new("category", "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_only_round_trips() {
        let date: TransactionDate = "2024-07-28".parse().unwrap();
        assert_eq!(date.day(), NaiveDate::from_ymd_opt(2024, 7, 28).unwrap());
        assert_eq!(date.to_string(), "2024-07-28");
    }

    #[test]
    fn timestamp_day_ignores_time_and_offset() {
        let late: TransactionDate = "2024-07-28T23:30:00-05:00".parse().unwrap();
        let early: TransactionDate = "2024-07-28T00:05:00+09:00".parse().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 7, 28).unwrap();
        assert_eq!(late.day(), day);
        assert_eq!(early.day(), day);
    }

    #[test]
    fn local_date_time_round_trips() {
        let date: TransactionDate = "2024-07-28T10:00:00".parse().unwrap();
        assert!(matches!(date, TransactionDate::Local(_)));
        assert_eq!(date.day(), NaiveDate::from_ymd_opt(2024, 7, 28).unwrap());
        assert_eq!(date.to_string(), "2024-07-28T10:00:00");

        let precise: TransactionDate = "2024-07-28T23:59:59.250".parse().unwrap();
        assert_eq!(precise.to_string(), "2024-07-28T23:59:59.250");

        let json = serde_json::to_value(date).unwrap();
        assert_eq!(json, "2024-07-28T10:00:00");
        assert_eq!(serde_json::from_value::<TransactionDate>(json).unwrap(), date);
    }

    #[test]
    fn local_date_time_orders_as_utc() {
        let local: TransactionDate = "2024-07-28T10:00:00".parse().unwrap();
        let utc: TransactionDate = "2024-07-28T10:00:00Z".parse().unwrap();
        let day: TransactionDate = "2024-07-28".parse().unwrap();
        assert_eq!(local.timestamp(), utc.timestamp());
        assert!(local.timestamp() > day.timestamp());
    }

    #[test]
    fn rejects_loose_dates() {
        assert!(parse_iso_date("startDate", "2024-7-28").is_err());
        assert!(parse_iso_date("startDate", "2024/07/28").is_err());
        assert!(parse_iso_date("startDate", "2024-02-30").is_err());
        assert!("yesterday".parse::<TransactionDate>().is_err());
    }

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let a = TransactionId::new();
        let b = TransactionId::new();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("txn_"));
    }

    #[test]
    fn transaction_serializes_camel_case_without_empty_notes() {
        let tx = Transaction {
            id: "txn_3".into(),
            title: "Dinner at The Italian Place".to_string(),
            amount: -55.0,
            category: "Dining Out".to_string(),
            date: "2024-07-26T19:30:00Z".parse().unwrap(),
            notes: None,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["id"], "txn_3");
        assert_eq!(json["date"], "2024-07-26T19:30:00+00:00");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn field_validation() {
        assert!(validate_fields("Coffee", -3.5, "Food").is_ok());
        assert_eq!(validate_fields("C", -3.5, "Food").unwrap_err().field, "title");
        assert_eq!(validate_fields("Coffee", 0.0, "Food").unwrap_err().field, "amount");
        assert_eq!(
            validate_fields("Coffee", f64::NAN, "Food").unwrap_err().field,
            "amount"
        );
        assert_eq!(validate_fields("Coffee", 1.0, " ").unwrap_err().field, "category");
    }
}
