//! Category suggestions for a single transaction.

use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use serde_json::Value;

use crate::error::{ExtractionError, ValidationError};
use crate::llm::{ARRAY, LanguageModel, OBJECT, complete_within, parse_json_reply, prompt};
use crate::telemetry::metrics;

/// Asks the model which categories fit a transaction.
#[derive(Clone)]
pub struct CategorySuggester {
    model: Arc<dyn LanguageModel>,
    timeout: Option<Duration>,
}

impl CategorySuggester {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Suggested categories, most relevant first.
    ///
    /// Blank entries are dropped and case-insensitive duplicates collapse to
    /// the first spelling. An empty list is an error.
    #[tracing::instrument(skip(self, notes), fields(model = %self.model.name()))]
    pub async fn suggest_categories(
        &self,
        title: &str,
        notes: Option<&str>,
    ) -> Result<Vec<String>, ExtractionError> {
        let started = Instant::now();
        let preamble = prompt::suggest_preamble();
        let user_prompt = prompt::suggest_prompt(title, notes);

        let result = match complete_within(self.model.as_ref(), self.timeout, &preamble, &user_prompt)
            .await
        {
            Ok(reply) => parse_json_reply(&reply, &[ARRAY, OBJECT])
                .and_then(|value| categories_from(&value)),
            Err(e) => Err(e),
        };

        metrics::operation_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("operation", "suggest_categories")],
        );
        if let Err(e) = &result {
            tracing::warn!(error = %e, "category suggestion failed");
            metrics::extraction_failures().add(
                1,
                &[
                    KeyValue::new("operation", "suggest_categories"),
                    KeyValue::new("kind", e.kind()),
                ],
            );
        }
        result
    }
}

fn categories_from(value: &Value) -> Result<Vec<String>, ExtractionError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(object) => match object.get("suggestedCategories") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ValidationError::new(
                    "suggestedCategories",
                    "expected an array of strings",
                )
                .into());
            }
        },
        _ => {
            return Err(ExtractionError::Malformed(
                "expected a JSON array of categories".to_string(),
            ));
        }
    };

    let mut categories: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(name) = item else {
            return Err(ValidationError::new("suggestedCategories", "entries must be strings").into());
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        if !categories.iter().any(|c| c.to_lowercase() == key) {
            categories.push(name.to_string());
        }
    }

    if categories.is_empty() {
        return Err(ValidationError::new("suggestedCategories", "no categories suggested").into());
    }
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_bare_array_and_wrapped_object() {
        assert_eq!(
            categories_from(&json!(["Subscriptions", "Entertainment"])).unwrap(),
            vec!["Subscriptions", "Entertainment"]
        );
        assert_eq!(
            categories_from(&json!({ "suggestedCategories": ["Bills"] })).unwrap(),
            vec!["Bills"]
        );
    }

    #[test]
    fn drops_blanks_and_case_duplicates() {
        assert_eq!(
            categories_from(&json!(["Food", " ", "food", "Dining Out"])).unwrap(),
            vec!["Food", "Dining Out"]
        );
        assert_eq!(
            categories_from(&json!(["Épicerie", "ÉPICERIE", "épicerie"])).unwrap(),
            vec!["Épicerie"]
        );
    }

    #[test]
    fn rejects_non_strings_and_empty_lists() {
        assert!(matches!(
            categories_from(&json!(["Food", 3])),
            Err(ExtractionError::Invalid(_))
        ));
        assert!(matches!(
            categories_from(&json!([])),
            Err(ExtractionError::Invalid(_))
        ));
        assert!(matches!(
            categories_from(&json!("Food")),
            Err(ExtractionError::Malformed(_))
        ));
    }
}
