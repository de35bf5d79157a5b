//! Reducers for the to-do app.
//!
//! [`TaskReducer`] and [`UiReducer`] each own one slice of [`AppState`];
//! [`AppReducer`] routes [`AppAction`] to them and handles `Submit`.
//!
//! [`AppState`]: crate::types::AppState
//! [`AppAction`]: crate::types::AppAction

mod app;
mod tasks;
mod ui;

pub use app::{AppEnvironment, AppReducer};
pub use tasks::{MAX_ID_ATTEMPTS, TaskEnvironment, TaskReducer};
pub use ui::UiReducer;
