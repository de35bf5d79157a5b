//! # Pocket Todo Core
//!
//! Core traits and types for the Pocket Todo state container.
//!
//! This crate provides the abstractions every feature of the application is
//! built from: state is only ever changed by a reducer, and reducers only
//! ever see the outside world through an injected environment.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature (task list, UI flags)
//! - **Action**: Closed enum of every input a reducer accepts
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Follow-up work described as a value, run by the Store
//! - **Environment**: Injected dependencies (clock, id generation)
//!
//! ## Example
//!
//! ```
//! use pocket_todo_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct ThemeState {
//!     dark: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ThemeAction {
//!     Toggle,
//! }
//!
//! struct ThemeReducer;
//!
//! impl Reducer for ThemeReducer {
//!     type State = ThemeState;
//!     type Action = ThemeAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ThemeState,
//!         action: ThemeAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<ThemeAction>; 4]> {
//!         match action {
//!             ThemeAction::Toggle => state.dark = !state.dark,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = ThemeState::default();
//! ThemeReducer.reduce(&mut state, ThemeAction::Toggle, &());
//! assert!(state.dark);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Action module - the common surface of every action enum
///
/// Actions are closed enums: one variant per operation, matched
/// exhaustively by the reducer that owns them.
pub mod action {
    /// Behavior shared by every action enum
    ///
    /// Usually derived with `#[derive(Action)]` from `pocket-todo-macros`.
    /// The runtime uses [`Action::name`] to label tracing spans and metrics,
    /// so it must be cheap and must not allocate.
    pub trait Action {
        /// The operation this action stands for, e.g. `"Create"`
        fn name(&self) -> &'static str;
    }
}

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns descriptions of follow-up
        /// work. Implementations must not fail: an action that cannot apply
        /// leaves the state untouched.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Follow-up work described as values
///
/// Effects are returned by reducers and run by the Store after the reducer
/// has finished, so a reducer never dispatches directly.
pub mod effect {
    /// Effect type - describes follow-up work for the Store
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Feed an action back into the store once the current one is applied
        Send(Action),

        /// Run effects in order
        Sequential(Vec<Effect<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true if running this effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Send(_) => false,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
            }
        }

        /// Lift an effect of a child action type into a parent action type
        ///
        /// Used by parent reducers to re-wrap whatever their children return.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: Fn(Action) -> B,
        {
            self.map_with(&f)
        }

        fn map_with<B, F>(self, f: &F) -> Effect<B>
        where
            F: Fn(Action) -> B,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Send(action) => Effect::Send(f(action)),
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map_with(f)).collect())
                },
            }
        }

        /// Flatten into the actions to send, in execution order
        #[must_use]
        pub fn into_actions(self) -> Vec<Action> {
            let mut actions = Vec::new();
            self.collect_actions(&mut actions);
            actions
        }

        fn collect_actions(self, out: &mut Vec<Action>) {
            match self {
                Effect::None => {},
                Effect::Send(action) => out.push(action),
                Effect::Sequential(effects) => {
                    for effect in effects {
                        effect.collect_actions(out);
                    }
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All non-deterministic inputs (time, identifiers) are abstracted behind
/// traits and injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of fresh opaque identifiers
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier
        fn next_id(&self) -> String;
    }

    /// Production id generator producing random v4 UUIDs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn next_id(&self) -> String {
            uuid::Uuid::new_v4().to_string()
        }
    }
}
