//! Natural-language query to [`TransactionFilter`].
//!
//! The model only extracts criteria; it never sees transactions. Whatever
//! it returns is validated against the filter schema before reaching the
//! caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use opentelemetry::KeyValue;

use crate::error::ExtractionError;
use crate::llm::{LanguageModel, OBJECT, complete_within, parse_json_reply, prompt};
use crate::model::filter::TransactionFilter;
use crate::telemetry::metrics;

/// Turns free-text queries into structured filters. Stateless across calls.
#[derive(Clone)]
pub struct FilterExtractor {
    model: Arc<dyn LanguageModel>,
    timeout: Option<Duration>,
}

impl FilterExtractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            timeout: None,
        }
    }

    /// Bound each model call. Expiry fails with [`ExtractionError::Timeout`].
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extract filters, resolving relative dates against today's local date.
    pub async fn extract_filters(&self, query: &str) -> Result<TransactionFilter, ExtractionError> {
        self.extract_filters_on(query, Local::now().date_naive())
            .await
    }

    /// Extract filters with an explicit reference date.
    #[tracing::instrument(skip(self, query), fields(model = %self.model.name()))]
    pub async fn extract_filters_on(
        &self,
        query: &str,
        today: NaiveDate,
    ) -> Result<TransactionFilter, ExtractionError> {
        let started = Instant::now();
        let result = self.run(query, today).await;

        metrics::operation_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("operation", "extract_filters")],
        );

        match &result {
            Ok(filter) => tracing::debug!(?filter, "filters extracted"),
            Err(e) => {
                tracing::warn!(error = %e, "filter extraction failed");
                metrics::extraction_failures().add(
                    1,
                    &[
                        KeyValue::new("operation", "extract_filters"),
                        KeyValue::new("kind", e.kind()),
                    ],
                );
            }
        }
        result
    }

    async fn run(&self, query: &str, today: NaiveDate) -> Result<TransactionFilter, ExtractionError> {
        let user_prompt = prompt::filter_prompt(query, today);
        let reply = complete_within(
            self.model.as_ref(),
            self.timeout,
            prompt::FILTER_PREAMBLE,
            &user_prompt,
        )
        .await?;

        let value = parse_json_reply(&reply, &[OBJECT])?;
        Ok(TransactionFilter::from_json(&value)?)
    }
}
