//! # Pocket Todo Testing
//!
//! Testing utilities and helpers for the Pocket Todo state container.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits
//! - A Given-When-Then harness for reducers
//! - proptest strategies for domain inputs
//!
//! ## Example
//!
//! ```ignore
//! use pocket_todo_testing::{test_clock, SequentialIdGenerator, ReducerTest};
//!
//! ReducerTest::new(TaskReducer::new())
//!     .with_env(TaskEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new("task"))))
//!     .given_state(TaskState::new())
//!     .when_action(TaskAction::Create { title: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.len(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use pocket_todo_core::environment::{Clock, IdGenerator};


/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use pocket_todo_testing::mocks::FixedClock;
    /// use pocket_todo_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable ids: `"{prefix}-1"`, `"{prefix}-2"`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use pocket_todo_testing::mocks::SequentialIdGenerator;
    /// use pocket_todo_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new("task");
    /// assert_eq!(ids.next_id(), "task-1");
    /// assert_eq!(ids.next_id(), "task-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start counting from 1 under `prefix`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}-{n}", self.prefix)
        }
    }

    /// Replays a fixed list of ids, then keeps repeating the last one
    ///
    /// Useful for forcing id collisions.
    #[derive(Debug)]
    pub struct ScriptedIdGenerator {
        ids: Vec<String>,
        cursor: AtomicU64,
    }

    impl ScriptedIdGenerator {
        /// Replay `ids` in order; an empty script yields empty strings
        #[must_use]
        pub fn new<I, T>(ids: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Into<String>,
        {
            Self {
                ids: ids.into_iter().map(Into::into).collect(),
                cursor: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for ScriptedIdGenerator {
        fn next_id(&self) -> String {
            let at = usize::try_from(self.cursor.fetch_add(1, Ordering::Relaxed))
                .unwrap_or(usize::MAX)
                .min(self.ids.len().saturating_sub(1));
            self.ids.get(at).cloned().unwrap_or_default()
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Titles as a view layer would submit them: non-empty, already trimmed
    pub fn title() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ,.!?'-]{0,38}[A-Za-z0-9]|[A-Za-z0-9]"
    }

    /// Raw user input: may carry surrounding whitespace or be blank
    pub fn raw_input() -> impl Strategy<Value = String> {
        prop_oneof![
            title(),
            (r"[ \t]{0,3}", title(), r"[ \t]{0,3}").prop_map(|(lead, t, trail)| format!("{lead}{t}{trail}")),
            r"[ \t\n]{0,4}",
        ]
    }

    /// Between `min` and `max` titles
    pub fn titles(min: usize, max: usize) -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(title(), min..=max)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ScriptedIdGenerator, SequentialIdGenerator, test_clock};
pub use reducer_test::ReducerTest;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.timestamp_millis(), 1_735_689_600_000);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new("t");
        assert_eq!(ids.next_id(), "t-1");
        assert_eq!(ids.next_id(), "t-2");
    }

    #[test]
    fn test_scripted_ids_repeat_last() {
        let ids = ScriptedIdGenerator::new(["a", "b"]);
        assert_eq!(ids.next_id(), "a");
        assert_eq!(ids.next_id(), "b");
        assert_eq!(ids.next_id(), "b");

        let empty = ScriptedIdGenerator::new(Vec::<String>::new());
        assert_eq!(empty.next_id(), "");
    }

    proptest! {
        #[test]
        fn generated_titles_are_trimmed_and_non_empty(t in properties::title()) {
            prop_assert!(!t.is_empty());
            prop_assert_eq!(t.trim(), t.as_str());
        }
    }
}
