//! Store metrics for observability.
//!
//! Metrics go through the `metrics` facade. Nothing is exported unless the
//! host application installs a recorder; without one every call is a no-op.
//!
//! # Example
//!
//! ```
//! use pocket_todo_runtime::metrics::{describe_metrics, StoreMetrics};
//! use std::time::Duration;
//!
//! describe_metrics();
//! StoreMetrics::record_action("Create", Duration::from_micros(3));
//! ```

use metrics::{describe_counter, describe_histogram};
use std::time::Duration;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Total actions applied, labelled by action name
pub const ACTIONS_TOTAL: &str = "store_actions_total";
/// Reducer execution time
pub const REDUCER_DURATION: &str = "store_reducer_duration_seconds";
/// Follow-up actions queued by effects
pub const FEEDBACK_TOTAL: &str = "store_feedback_actions_total";
/// Listener invocations
pub const LISTENERS_NOTIFIED: &str = "store_listeners_notified_total";

/// Register all metric descriptions with the installed recorder.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total number of actions applied by the store");
    describe_histogram!(REDUCER_DURATION, "Time taken to run the reducer for one action");
    describe_counter!(FEEDBACK_TOTAL, "Total number of follow-up actions queued by effects");
    describe_counter!(LISTENERS_NOTIFIED, "Total number of listener invocations");
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record an applied action.
    pub fn record_action(action: &'static str, duration: Duration) {
        counter!(ACTIONS_TOTAL, "action" => action).increment(1);
        histogram!(REDUCER_DURATION).record(duration.as_secs_f64());
    }

    /// Record follow-up actions queued by effects.
    pub fn record_feedback(count: usize) {
        counter!(FEEDBACK_TOTAL).increment(count as u64);
    }

    /// Record listener invocations for one applied action.
    pub fn record_notified(count: usize) {
        counter!(LISTENERS_NOTIFIED).increment(count as u64);
    }
}
