//! Composition root: routes actions to the slice reducers.

use super::{TaskEnvironment, TaskReducer, UiReducer};
use crate::types::{AppAction, AppState, TaskAction, UiAction};
use pocket_todo_core::{
    SmallVec,
    effect::Effect,
    environment::{Clock, IdGenerator},
    reducer::Reducer,
    smallvec,
};
use std::sync::Arc;

/// Environment for [`AppReducer`]
#[derive(Clone, Debug)]
pub struct AppEnvironment {
    /// Dependencies of the task slice
    pub tasks: TaskEnvironment,
}

impl AppEnvironment {
    /// Creates an environment from a clock and an id source
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            tasks: TaskEnvironment::new(clock, ids),
        }
    }

    /// Wall clock and random UUIDs
    #[must_use]
    pub fn production() -> Self {
        Self {
            tasks: TaskEnvironment::production(),
        }
    }
}

/// Root reducer for [`AppState`]
///
/// `Tasks` and `Ui` actions are forwarded to [`TaskReducer`] and
/// [`UiReducer`] with their effects lifted back into [`AppAction`].
/// `Submit` touches no state itself: it trims the input and, unless the
/// result is blank, asks the store to create the task and then raise the
/// banner.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppReducer {
    tasks: TaskReducer,
    ui: UiReducer,
}

impl AppReducer {
    /// Creates a new `AppReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: TaskReducer::new(),
            ui: UiReducer::new(),
        }
    }

    fn submit(title: &str) -> SmallVec<[Effect<AppAction>; 4]> {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!("Blank submission dropped");
            return SmallVec::new();
        }

        smallvec![Effect::chain(vec![
            Effect::Send(AppAction::Tasks(TaskAction::Create {
                title: title.to_owned(),
            })),
            Effect::Send(AppAction::Ui(UiAction::TriggerBanner)),
        ])]
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::Tasks(action) => self
                .tasks
                .reduce(&mut state.tasks, action, &env.tasks)
                .into_iter()
                .map(|effect| effect.map(AppAction::Tasks))
                .collect(),

            AppAction::Ui(action) => self
                .ui
                .reduce(&mut state.ui, action, &())
                .into_iter()
                .map(|effect| effect.map(AppAction::Ui))
                .collect(),

            AppAction::Submit { title } => Self::submit(&title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_todo_testing::{ReducerTest, SequentialIdGenerator, test_clock};

    fn test_env() -> AppEnvironment {
        AppEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new("task")),
        )
    }

    #[test]
    fn task_actions_reach_the_task_slice() {
        ReducerTest::new(AppReducer::new())
            .with_env(test_env())
            .given_state(AppState::new())
            .when_action(AppAction::create_task("Buy milk"))
            .then_state(|state| {
                assert_eq!(state.tasks.len(), 1);
                assert_eq!(state.tasks.as_slice()[0].title, "Buy milk");
                assert_eq!(state.ui, AppState::new().ui);
            })
            .then_no_effects()
            .run();
    }

    #[test]
    fn ui_actions_reach_the_ui_slice() {
        ReducerTest::new(AppReducer::new())
            .with_env(test_env())
            .given_state(AppState::new())
            .when_actions([
                AppAction::Ui(UiAction::ToggleTheme),
                AppAction::Ui(UiAction::TriggerBanner),
            ])
            .then_state(|state| {
                assert!(state.ui.dark);
                assert!(state.ui.banner_visible);
                assert!(state.tasks.is_empty());
            })
            .run();
    }

    #[test]
    fn submit_trims_then_creates_and_raises_banner() {
        ReducerTest::new(AppReducer::new())
            .with_env(test_env())
            .given_state(AppState::new())
            .when_action(AppAction::submit("  Walk dog \n"))
            .then_state(|state| assert_eq!(*state, AppState::new()))
            .then_sends([
                AppAction::create_task("Walk dog"),
                AppAction::Ui(UiAction::TriggerBanner),
            ])
            .run();
    }

    #[test]
    fn blank_submit_does_nothing() {
        ReducerTest::new(AppReducer::new())
            .with_env(test_env())
            .given_state(AppState::new())
            .when_actions([AppAction::submit(""), AppAction::submit(" \t ")])
            .then_state(|state| assert_eq!(*state, AppState::new()))
            .then_no_effects()
            .run();
    }
}
