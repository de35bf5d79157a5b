//! Theme and banner flags.

use crate::types::{UiAction, UiState};
use pocket_todo_core::{SmallVec, effect::Effect, reducer::Reducer};

/// Reducer for [`UiState`]
///
/// Needs no environment; every action is a plain flag update.
#[derive(Clone, Copy, Debug, Default)]
pub struct UiReducer;

impl UiReducer {
    /// Creates a new `UiReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for UiReducer {
    type State = UiState;
    type Action = UiAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            UiAction::ToggleTheme => {
                state.dark = !state.dark;
                tracing::debug!(dark = state.dark, "Theme toggled");
            },
            UiAction::TriggerBanner => state.banner_visible = true,
            UiAction::HideBanner => state.banner_visible = false,
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_todo_testing::ReducerTest;

    #[test]
    fn toggle_theme_flips_dark() {
        ReducerTest::new(UiReducer::new())
            .with_env(())
            .given_state(UiState::default())
            .when_action(UiAction::ToggleTheme)
            .then_state(|state| {
                assert!(state.dark);
                assert!(!state.banner_visible);
            })
            .then_no_effects()
            .run();
    }

    #[test]
    fn toggle_theme_twice_restores_theme() {
        ReducerTest::new(UiReducer::new())
            .with_env(())
            .given_state(UiState {
                dark: true,
                banner_visible: false,
            })
            .when_actions([UiAction::ToggleTheme, UiAction::ToggleTheme])
            .then_state(|state| assert!(state.dark))
            .run();
    }

    #[test]
    fn banner_shows_and_hides() {
        ReducerTest::new(UiReducer::new())
            .with_env(())
            .given_state(UiState::default())
            .when_action(UiAction::TriggerBanner)
            .then_state(|state| assert!(state.banner_visible))
            .run();

        ReducerTest::new(UiReducer::new())
            .with_env(())
            .given_state(UiState {
                dark: true,
                banner_visible: true,
            })
            .when_action(UiAction::HideBanner)
            .then_state(|state| {
                assert!(!state.banner_visible);
                assert!(state.dark);
            })
            .run();
    }

    #[test]
    fn banner_actions_are_idempotent() {
        ReducerTest::new(UiReducer::new())
            .with_env(())
            .given_state(UiState::default())
            .when_actions([
                UiAction::TriggerBanner,
                UiAction::TriggerBanner,
                UiAction::HideBanner,
                UiAction::HideBanner,
            ])
            .then_state(|state| assert_eq!(*state, UiState::default()))
            .then_no_effects()
            .run();
    }
}
