//! Language-model access.
//!
//! Everything that talks to a model goes through the [`LanguageModel`]
//! trait: one preamble, one prompt, one text reply. [`AnthropicModel`]
//! implements it with rig-core; tests supply scripted implementations.
//!
//! # Example
//! ```no_run
//! use tally_rs::llm::{AnthropicModel, anthropic_client};
//! use secrecy::SecretString;
//!
//! let key = SecretString::from("sk-ant-...");
//! let client = anthropic_client(&key).expect("failed to create Anthropic client");
//! let model = AnthropicModel::new(client, "claude-sonnet-4-20250514");
//! ```

pub mod extract;
pub mod prompt;
pub mod suggest;

use std::time::Duration;

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use serde_json::Value;
use tracing::Instrument;

use crate::config::secrets::{ExposeSecret, SecretString};
use crate::error::ExtractionError;
use crate::telemetry::genai;

pub use extract::FilterExtractor;
pub use suggest::CategorySuggester;

/// Replies are small JSON objects; this is generous headroom.
const MAX_OUTPUT_TOKENS: u64 = 1024;

/// A text completion endpoint.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, for logs and spans.
    fn name(&self) -> &str;

    /// Run a single completion and return the raw reply text.
    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String, ExtractionError>;
}

/// Run a completion, failing with [`ExtractionError::Timeout`] if `timeout`
/// elapses first.
pub(crate) async fn complete_within(
    model: &dyn LanguageModel,
    timeout: Option<Duration>,
    preamble: &str,
    prompt: &str,
) -> Result<String, ExtractionError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, model.complete(preamble, prompt))
            .await
            .map_err(|_| ExtractionError::Timeout(limit))?,
        None => model.complete(preamble, prompt).await,
    }
}

/// Delimiters of a JSON object span.
pub(crate) const OBJECT: (char, char) = ('{', '}');
/// Delimiters of a JSON array span.
pub(crate) const ARRAY: (char, char) = ('[', ']');

/// Pull the JSON value out of a model reply.
///
/// Models sometimes wrap the value in a Markdown fence or a sentence of
/// prose. The reply is parsed whole first, then for each `(open, close)`
/// pair in `spans`, in order, the text from the first `open` to the last
/// `close` is tried.
pub(crate) fn parse_json_reply(
    reply: &str,
    spans: &[(char, char)],
) -> Result<Value, ExtractionError> {
    let trimmed = reply.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let mut last_error = None;
    for &(open, close) in spans {
        let (Some(start), Some(end)) = (trimmed.find(open), trimmed.rfind(close)) else {
            continue;
        };
        if start >= end {
            continue;
        }
        match serde_json::from_str(&trimmed[start..=end]) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = Some(e),
        }
    }

    Err(ExtractionError::Malformed(match last_error {
        Some(e) => format!("{e}: {}", excerpt(trimmed)),
        None => format!("no JSON value in reply: {}", excerpt(trimmed)),
    }))
}

fn excerpt(reply: &str) -> String {
    const MAX: usize = 120;
    match reply.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &reply[..idx]),
        None => reply.to_string(),
    }
}

/// Create an Anthropic client from a secret API key.
///
/// # Errors
/// Returns an error if the underlying HTTP client cannot be constructed.
pub fn anthropic_client(
    api_key: &SecretString,
) -> Result<rig::providers::anthropic::Client, rig::http_client::Error> {
    rig::providers::anthropic::Client::new(api_key.expose_secret())
}

/// An Anthropic chat model driven through a rig-core agent.
#[derive(Clone)]
pub struct AnthropicModel {
    client: rig::providers::anthropic::Client,
    model: String,
}

impl AnthropicModel {
    pub fn new(client: rig::providers::anthropic::Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl LanguageModel for AnthropicModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String, ExtractionError> {
        let span = genai::start_chat_span(&self.model, "anthropic");
        let agent = self
            .client
            .agent(&self.model)
            .preamble(preamble)
            .temperature(0.0)
            .max_tokens(MAX_OUTPUT_TOKENS)
            .build();

        let reply = async { agent.prompt(prompt).await }
            .instrument(span.clone())
            .await
            .map_err(|e| ExtractionError::Completion(e.to_string()))?;

        genai::record_response(&span, &self.model, reply.len());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bare_json() {
        assert_eq!(parse_json_reply(" {} ", &[OBJECT]).unwrap(), json!({}));
        assert_eq!(parse_json_reply("[]", &[OBJECT]).unwrap(), json!([]));
    }

    #[test]
    fn parses_fenced_and_prose_wrapped_json() {
        let fenced = "```json\n{\"category\": \"Food\"}\n```";
        assert_eq!(
            parse_json_reply(fenced, &[OBJECT]).unwrap(),
            json!({ "category": "Food" })
        );

        let prose = "Here are the filters: {\"minAmount\": 50} Hope that helps.";
        assert_eq!(
            parse_json_reply(prose, &[OBJECT]).unwrap(),
            json!({ "minAmount": 50 })
        );

        let array = "Suggestions:\n[\"Bills\", \"Utilities\"]";
        assert_eq!(
            parse_json_reply(array, &[ARRAY, OBJECT]).unwrap(),
            json!(["Bills", "Utilities"])
        );
    }

    #[test]
    fn brackets_in_prose_do_not_hide_the_object() {
        let reply = "Filters for [dining out]: {\"category\": \"Dining Out\"}";
        assert_eq!(
            parse_json_reply(reply, &[OBJECT]).unwrap(),
            json!({ "category": "Dining Out" })
        );

        let reply = "Categories [best guess]: {\"suggestedCategories\": [\"Food\"]}";
        assert_eq!(
            parse_json_reply(reply, &[ARRAY, OBJECT]).unwrap(),
            json!({ "suggestedCategories": ["Food"] })
        );
    }

    #[test]
    fn rejects_replies_without_json() {
        assert!(matches!(
            parse_json_reply("I could not find any filters.", &[OBJECT]),
            Err(ExtractionError::Malformed(_))
        ));
        assert!(matches!(
            parse_json_reply("{ category: Food }", &[OBJECT]),
            Err(ExtractionError::Malformed(_))
        ));
        assert!(matches!(
            parse_json_reply("Try [Food] next time.", &[OBJECT]),
            Err(ExtractionError::Malformed(_))
        ));
    }
}
