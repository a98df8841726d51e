//! Integration tests for telemetry initialization and span helpers.

use tally_rs::telemetry::{TelemetryConfig, genai, init_telemetry};

#[test]
fn telemetry_initializes_without_endpoint() {
    // Note: tracing subscriber can only be set once per process.
    // This may return Err if a global subscriber was already set by
    // another test in this process; that is acceptable.
    let config = TelemetryConfig {
        endpoint: None,
        service_name: "tally-test".to_string(),
        log_level: "debug".to_string(),
    };
    let _guard = init_telemetry(config);
}

#[test]
fn genai_chat_span_records_response() {
    let span = genai::start_chat_span("claude-test", "anthropic");
    genai::record_response(&span, "claude-test", 42);
}

#[test]
fn metric_instruments_build_without_provider() {
    use opentelemetry::KeyValue;
    use tally_rs::telemetry::metrics;

    metrics::searches().add(1, &[KeyValue::new("result", "ok")]);
    metrics::filter_matches().record(3, &[]);
    metrics::operation_duration_ms().record(1.5, &[KeyValue::new("operation", "search")]);
}
