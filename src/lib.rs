//! # tally-rs
//!
//! Personal finance core: transactions, dashboard summaries, and
//! natural-language search.
//!
//! A search turns free text into a [`TransactionFilter`] with a language
//! model (rig-core), then applies it deterministically to an in-memory
//! transaction list. Storage, configuration, and OpenTelemetry
//! observability sit around that pipeline.
//!
//! [`TransactionFilter`]: model::filter::TransactionFilter

pub mod config;
pub mod error;
pub mod llm;
pub mod model;
pub mod search;
pub mod store;
pub mod summary;
pub mod telemetry;
