//! GenAI semantic convention span helpers for model calls.
//!
//! Uses OpenTelemetry GenAI semantic conventions:
//! - `gen_ai.operation.name`
//! - `gen_ai.request.model`
//! - `gen_ai.response.model`
//! - `gen_ai.provider.name`

use tracing::Span;

/// Start a span for a chat/completion operation.
///
/// `gen_ai.response.model` is declared empty and filled by
/// [`record_response`] once a reply arrives.
pub fn start_chat_span(model: &str, provider: &str) -> Span {
    tracing::info_span!(
        "gen_ai.chat",
        "gen_ai.operation.name" = "chat",
        "gen_ai.request.model" = model,
        "gen_ai.provider.name" = provider,
        "gen_ai.response.model" = tracing::field::Empty,
    )
}

/// Record a successful reply on a span created by [`start_chat_span`].
pub fn record_response(span: &Span, model: &str, reply_len: usize) {
    span.record("gen_ai.response.model", model);
    span.in_scope(|| {
        tracing::debug!(reply_len, "completion received");
    });
}
