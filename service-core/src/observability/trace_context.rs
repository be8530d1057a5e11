//! W3C trace context on outbound `reqwest` calls.
//!
//! Requests to first-party collaborators (identity service, profile store)
//! are finished with [`PropagateTraceContext::propagate_trace_context`] so
//! their spans join the caller's trace. Third-party LLM vendors get no trace
//! headers.

use opentelemetry::trace::{SpanContext, TraceContextExt as _};
use reqwest::RequestBuilder;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";

/// `traceparent` value (`version-trace_id-span_id-flags`) for a span context.
pub fn traceparent(span_context: &SpanContext) -> Option<String> {
    span_context.is_valid().then(|| {
        format!(
            "00-{}-{}-{:02x}",
            span_context.trace_id(),
            span_context.span_id(),
            span_context.trace_flags().to_u8()
        )
    })
}

pub trait PropagateTraceContext {
    /// Attach the current span's trace headers. A no-op without an
    /// OpenTelemetry context, e.g. when no OTLP exporter is installed.
    fn propagate_trace_context(self) -> Self;
}

impl PropagateTraceContext for RequestBuilder {
    fn propagate_trace_context(self) -> Self {
        let context = tracing::Span::current().context();
        let span = context.span();
        let span_context = span.span_context();

        let Some(parent) = traceparent(span_context) else {
            return self;
        };

        let request = self.header(TRACEPARENT_HEADER, parent);
        let state = span_context.trace_state().header();
        if state.is_empty() {
            request
        } else {
            request.header(TRACESTATE_HEADER, state)
        }
    }
}
