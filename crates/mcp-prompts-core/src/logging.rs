//! Logging context and scoped timing spans.
//!
//! The [`LogContext`] is constructed once at startup and passed to every
//! component that performs timed work. A [`TimingSpan`] is acquired with
//! [`LogContext::span`] and records its completion when dropped, so a span
//! left behind by an early `?` return is still reported.
//!
//! # Examples
//!
//! ```
//! use mcp_prompts_core::{LogContext, LogLevel};
//!
//! let log = LogContext::new(LogLevel::Debug);
//! let span = log.span("load prompts");
//! assert_eq!(log.in_flight_spans(), 1);
//! span.complete();
//! assert_eq!(log.in_flight_spans(), 0);
//! ```

use crate::LogLevel;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Shared logging state for one server process.
///
/// Cloning is cheap; clones share the span identifier sequence and the
/// in-flight counter.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    level: LogLevel,
    counters: Arc<SpanCounters>,
}

#[derive(Debug, Default)]
struct SpanCounters {
    next_id: AtomicU64,
    in_flight: AtomicU64,
}

impl LogContext {
    /// Creates a logging context for the given verbosity.
    #[must_use]
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            counters: Arc::default(),
        }
    }

    /// Returns the configured verbosity.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Starts a timing span for `operation`.
    pub fn span(&self, operation: impl Into<String>) -> TimingSpan {
        let id = self.counters.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.counters.in_flight.fetch_add(1, Ordering::Relaxed);

        let operation = operation.into();
        tracing::trace!(span_id = id, operation = %operation, "operation started");

        TimingSpan {
            id,
            operation,
            started: Instant::now(),
            status: SpanStatus::Running,
            counters: Arc::clone(&self.counters),
        }
    }

    /// Returns the number of spans that have been started but not dropped.
    #[must_use]
    pub fn in_flight_spans(&self) -> u64 {
        self.counters.in_flight.load(Ordering::Relaxed)
    }
}

/// Outcome recorded by a [`TimingSpan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanStatus {
    /// Neither completed nor failed yet
    Running,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed(String),
}

/// Timer guard for a single operation.
///
/// The completion record is emitted from `Drop`. A span dropped while still
/// [`SpanStatus::Running`] is reported as abandoned.
#[derive(Debug)]
#[must_use = "a span records its duration when dropped"]
pub struct TimingSpan {
    id: u64,
    operation: String,
    started: Instant,
    status: SpanStatus,
    counters: Arc<SpanCounters>,
}

impl TimingSpan {
    /// Generated identifier of this span, unique within its context.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Name of the timed operation.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Current outcome.
    #[must_use]
    pub const fn status(&self) -> &SpanStatus {
        &self.status
    }

    /// Time since the span was started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Marks the operation as successful and ends the span.
    pub fn complete(mut self) {
        self.status = SpanStatus::Completed;
    }

    /// Marks the operation as failed and ends the span.
    pub fn fail(mut self, reason: impl fmt::Display) {
        self.status = SpanStatus::Failed(reason.to_string());
    }
}

impl Drop for TimingSpan {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::Relaxed);

        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        match &self.status {
            SpanStatus::Completed => tracing::debug!(
                span_id = self.id,
                operation = %self.operation,
                elapsed_ms,
                "operation completed"
            ),
            SpanStatus::Failed(reason) => tracing::warn!(
                span_id = self.id,
                operation = %self.operation,
                elapsed_ms,
                reason = %reason,
                "operation failed"
            ),
            SpanStatus::Running => tracing::debug!(
                span_id = self.id,
                operation = %self.operation,
                elapsed_ms,
                "operation abandoned"
            ),
        }
    }
}
