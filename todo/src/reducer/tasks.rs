//! Reducer logic for the task list.

use crate::types::{Task, TaskAction, TaskId, TaskState};
use pocket_todo_core::{
    SmallVec,
    effect::Effect,
    environment::{Clock, IdGenerator, SystemClock, UuidGenerator},
    reducer::Reducer,
};
use std::sync::Arc;

/// How many fresh ids `Create` draws before giving up on a collision
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Environment dependencies for the task reducer
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of task ids
    pub ids: Arc<dyn IdGenerator>,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Wall clock and random UUIDs
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

impl std::fmt::Debug for TaskEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the task list
///
/// Invalid operations are no-ops: an empty title, or an id that isn't in
/// the list, leaves the state as it was.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskReducer;

impl TaskReducer {
    /// Creates a new `TaskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Draws ids until one is not already in the list
    fn fresh_id(state: &TaskState, env: &TaskEnvironment) -> Option<TaskId> {
        (0..MAX_ID_ATTEMPTS)
            .map(|_| TaskId::from(env.ids.next_id()))
            .find(|id| !state.contains(id))
    }

    fn create(state: &mut TaskState, title: String, env: &TaskEnvironment) {
        if title.is_empty() {
            tracing::warn!("Ignoring task with empty title");
            return;
        }

        let Some(id) = Self::fresh_id(state, env) else {
            tracing::error!(
                attempts = MAX_ID_ATTEMPTS,
                "Could not generate a unique task id, task dropped"
            );
            return;
        };

        tracing::debug!(task = %id, "Task created");
        state.insert_front(Task::new(id, title, env.clock.now()));
    }
}

impl Reducer for TaskReducer {
    type State = TaskState;
    type Action = TaskAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TaskAction::Create { title } => Self::create(state, title, env),

            TaskAction::Toggle { id } => {
                if !state.toggle(&id) {
                    tracing::trace!(task = %id, "Toggle ignored, no such task");
                }
            },

            TaskAction::Delete { id } => match state.remove(&id) {
                Some(_) => tracing::debug!(task = %id, "Task deleted"),
                None => tracing::trace!(task = %id, "Delete ignored, no such task"),
            },

            TaskAction::Wipe => {
                let removed = state.clear();
                tracing::debug!(removed, "Tasks wiped");
            },
        }

        SmallVec::new()
    }
}
