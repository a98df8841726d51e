//! Metric instrument factories for tally-rs.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"tally-rs"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for tally-rs instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("tally-rs")
}

/// Counter: natural-language searches.
/// Labels: `result` ("ok" | "blank" | "error").
pub fn searches() -> Counter<u64> {
    meter()
        .u64_counter("tally.search.requests")
        .with_description("Number of natural-language searches")
        .build()
}

/// Counter: model calls whose output could not be used.
/// Labels: `operation` ("extract_filters" | "suggest_categories"), `kind`.
pub fn extraction_failures() -> Counter<u64> {
    meter()
        .u64_counter("tally.llm.extraction_failures")
        .with_description("Model calls that failed or returned unusable output")
        .build()
}

/// Histogram: transactions kept by a filter.
pub fn filter_matches() -> Histogram<u64> {
    meter()
        .u64_histogram("tally.search.matches")
        .with_description("Number of transactions matched by a search")
        .build()
}

/// Histogram: operation duration in milliseconds.
/// Labels: `operation`.
pub fn operation_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("tally.operation.duration_ms")
        .with_description("Operation duration in milliseconds")
        .with_unit("ms")
        .build()
}
