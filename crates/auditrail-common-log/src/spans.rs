//! Span and timing helpers.

use tracing::{debug_span, info_span, Span};

/// Span covering one unit of work handed to the audit pipeline.
pub fn unit_of_work_span(unit_id: &str, entries: usize) -> Span {
    info_span!(
        "unit_of_work",
        id = %unit_id,
        entries,
        records = tracing::field::Empty,
        error = tracing::field::Empty
    )
}

/// Span covering the diff of one tracked entity.
pub fn entity_span(table: &str, state: &str) -> Span {
    debug_span!("entity", table = %table, state = %state, error = tracing::field::Empty)
}

/// Record an error on the current span.
///
/// Only spans declaring an `error` field keep it; both helpers above do.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", tracing::field::display(error));
}

/// Timing utility for operations.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Complete the timer, log the duration and return it.
    pub fn finish(self) -> std::time::Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_us = %duration.as_micros(),
            "operation completed"
        );
        duration
    }
}

/// Macro for timing a block of code.
#[macro_export]
macro_rules! timed {
    ($name:expr, $body:expr) => {{
        let _timer = $crate::spans::Timer::start($name);
        let result = $body;
        _timer.finish();
        result
    }};
}

/// Re-export of tracing::instrument for convenience.
pub use tracing::instrument;
