//! State for a single-screen to-do app.
//!
//! The store holds a task list and two UI flags. The view layer dispatches
//! [`AppAction`]s and re-renders from [`AppState`] after every change:
//!
//! - Tasks: create, toggle, delete, wipe
//! - UI: toggle the theme, show and hide the notification banner
//! - `Submit`: trimmed "add task" input that creates the task and raises
//!   the banner in one dispatch
//!
//! # Quick Start
//!
//! ```
//! use pocket_todo::{AppAction, AppConfig, new_store};
//!
//! let store = new_store(&AppConfig::default());
//!
//! let subscription = store.subscribe(|state| {
//!     println!("{} tasks", state.tasks.len());
//! });
//!
//! store.send(AppAction::submit("  Buy milk  "));
//!
//! let (title, banner) = store.state(|s| (s.tasks.as_slice()[0].title.clone(), s.ui.banner_visible));
//! assert_eq!(title, "Buy milk");
//! assert!(banner);
//!
//! subscription.unsubscribe();
//! ```

pub mod config;
pub mod error;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::TodoError;
pub use reducer::{AppEnvironment, AppReducer, TaskEnvironment, TaskReducer, UiReducer};
pub use types::{AppAction, AppState, Task, TaskAction, TaskId, TaskState, UiAction, UiState};

use pocket_todo_runtime::Store;

/// The app's store
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Creates a store with an empty list, the wall clock and random UUIDs
#[must_use]
pub fn new_store(config: &AppConfig) -> AppStore {
    store_with_environment(AppEnvironment::production(), config)
}

/// Creates a store with an empty list and the given environment
#[must_use]
pub fn store_with_environment(environment: AppEnvironment, config: &AppConfig) -> AppStore {
    Store::with_config(AppState::new(), AppReducer::new(), environment, config.store)
}
