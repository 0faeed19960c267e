//! Span utilities for session tracing.
//!
//! A session's span is the "logger" it is initialized with; calculations open
//! a child span under it and record their outcome.

use tracing::{debug_span, info_span, Span};

/// Extension trait for adding context to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for standardized session spans.
pub struct SessionSpan;

impl SessionSpan {
    /// Root span for a session. `label` names the owner, e.g. the strategy
    /// that allocated it.
    pub fn new(label: &str) -> Span {
        info_span!("feature_session", label = %label)
    }

    /// Child span for one calculation request.
    ///
    /// Fields:
    /// - `binding`: index of the binding in its session
    /// - `status`: filled in by `SpanExt::record_result`
    /// - `error.message`: filled in on error
    pub fn calculation(parent: &Span, binding: usize) -> Span {
        debug_span!(
            parent: parent,
            "calculate",
            binding,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    }
}
