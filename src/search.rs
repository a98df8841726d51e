//! Natural-language search: extract a filter, then apply it.
//!
//! The composition adds no policy of its own. If extraction fails the
//! error is handed back untouched and nothing is filtered; falling back to
//! an unfiltered view or surfacing the error is up to the caller.

use std::time::Instant;

use opentelemetry::KeyValue;

use crate::error::ExtractionError;
use crate::llm::FilterExtractor;
use crate::model::Transaction;
use crate::model::filter::{TransactionFilter, apply_filter};
use crate::telemetry::metrics;

/// The filter a search used and what it matched.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub filter: TransactionFilter,
    pub transactions: Vec<Transaction>,
}

/// Runs natural-language searches over caller-supplied transactions.
#[derive(Clone)]
pub struct TransactionSearch {
    extractor: FilterExtractor,
}

impl TransactionSearch {
    pub fn new(extractor: FilterExtractor) -> Self {
        Self { extractor }
    }

    /// Matching transactions for `query`, in input order.
    pub async fn search(
        &self,
        query: &str,
        transactions: &[Transaction],
    ) -> Result<Vec<Transaction>, ExtractionError> {
        self.search_detailed(query, transactions)
            .await
            .map(|result| result.transactions)
    }

    /// Like [`search`](Self::search), also returning the extracted filter.
    ///
    /// A blank query skips the model and matches everything.
    #[tracing::instrument(skip(self, transactions), fields(candidates = transactions.len()))]
    pub async fn search_detailed(
        &self,
        query: &str,
        transactions: &[Transaction],
    ) -> Result<SearchResult, ExtractionError> {
        let started = Instant::now();

        if query.trim().is_empty() {
            metrics::searches().add(1, &[KeyValue::new("result", "blank")]);
            return Ok(SearchResult {
                filter: TransactionFilter::new(),
                transactions: transactions.to_vec(),
            });
        }

        let filter = match self.extractor.extract_filters(query).await {
            Ok(filter) => filter,
            Err(e) => {
                metrics::searches().add(1, &[KeyValue::new("result", "error")]);
                return Err(e);
            }
        };

        let matched = apply_filter(transactions, &filter);
        tracing::info!(matched = matched.len(), "search complete");

        metrics::searches().add(1, &[KeyValue::new("result", "ok")]);
        metrics::filter_matches().record(matched.len() as u64, &[]);
        metrics::operation_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("operation", "search")],
        );

        Ok(SearchResult {
            filter,
            transactions: matched,
        })
    }
}
