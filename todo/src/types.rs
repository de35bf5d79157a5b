//! Domain types for the to-do app.
//!
//! Two pieces of state live in the store: the task list and the UI flags.
//! Each has its own closed action enum; [`AppAction`] routes between them.

use crate::error::TodoError;
use chrono::{DateTime, Utc};
use pocket_todo_macros::Action;
use serde::{Deserialize, Serialize};

/// Opaque, unique identifier of a task
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an identifier string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single task
///
/// Only `done` changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// What needs doing
    pub title: String,
    /// Whether the task is finished
    pub done: bool,
    /// When the task was created (epoch milliseconds on the wire)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, unfinished task
    #[must_use]
    pub const fn new(id: TaskId, title: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            done: false,
            created_at,
        }
    }

    /// Creation time in milliseconds since the Unix epoch
    #[must_use]
    pub fn created_at_millis(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}

/// The task list, most recent first
///
/// Ids are unique within the list. Mutation is crate-private: only the task
/// reducer changes it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskState {
    tasks: Vec<Task>,
}

impl TaskState {
    /// Creates an empty task list
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks a task up by id
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Whether a task with this id exists
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Tasks in display order (most recent first)
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Tasks in display order, as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of finished tasks
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.done).count()
    }

    /// Number of unfinished tasks
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.len() - self.done_count()
    }

    pub(crate) fn insert_front(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Flips `done`; returns false if no task has this id
    pub(crate) fn toggle(&mut self, id: &TaskId) -> bool {
        match self.tasks.iter_mut().find(|task| &task.id == id) {
            Some(task) => {
                task.done = !task.done;
                true
            },
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| &task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Empties the list, returning how many tasks were dropped
    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        removed
    }
}

impl<'a> IntoIterator for &'a TaskState {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Presentation flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Dark theme selected
    pub dark: bool,
    /// Transient notification banner shown
    pub banner_visible: bool,
}

/// Everything the store holds
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AppState {
    /// The task list
    pub tasks: TaskState,
    /// Theme and banner flags
    pub ui: UiState,
}

impl AppState {
    /// Initial state: no tasks, light theme, banner hidden
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: TaskState::new(),
            ui: UiState {
                dark: false,
                banner_visible: false,
            },
        }
    }

    /// JSON snapshot for a view layer running outside Rust
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Snapshot`] if serialization fails.
    pub fn to_json(&self) -> Result<String, TodoError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Task list operations
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TaskAction {
    /// Add a task at the head of the list
    Create {
        /// Title of the new task; expected to be trimmed and non-empty
        title: String,
    },

    /// Flip a task's `done` flag; unknown ids are ignored
    Toggle {
        /// Task to flip
        id: TaskId,
    },

    /// Remove a task; unknown ids are ignored
    Delete {
        /// Task to remove
        id: TaskId,
    },

    /// Remove every task
    Wipe,
}

/// UI flag operations
#[derive(Action, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    /// Switch between light and dark theme
    ToggleTheme,
    /// Show the notification banner
    TriggerBanner,
    /// Hide the notification banner
    HideBanner,
}

/// Everything that can be dispatched to the store
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    /// Routed to the task reducer
    #[nested]
    Tasks(TaskAction),

    /// Routed to the UI reducer
    #[nested]
    Ui(UiAction),

    /// Raw "add task" input from the view: trimmed, then created and
    /// acknowledged with the banner unless blank
    Submit {
        /// Text as typed
        title: String,
    },
}

impl AppAction {
    /// `Tasks(Create { title })`
    #[must_use]
    pub fn create_task(title: impl Into<String>) -> Self {
        Self::Tasks(TaskAction::Create {
            title: title.into(),
        })
    }

    /// `Tasks(Toggle { id })`
    #[must_use]
    pub fn toggle_task(id: impl Into<TaskId>) -> Self {
        Self::Tasks(TaskAction::Toggle { id: id.into() })
    }

    /// `Tasks(Delete { id })`
    #[must_use]
    pub fn delete_task(id: impl Into<TaskId>) -> Self {
        Self::Tasks(TaskAction::Delete { id: id.into() })
    }

    /// `Tasks(Wipe)`
    #[must_use]
    pub const fn wipe_tasks() -> Self {
        Self::Tasks(TaskAction::Wipe)
    }

    /// `Submit { title }`
    #[must_use]
    pub fn submit(title: impl Into<String>) -> Self {
        Self::Submit {
            title: title.into(),
        }
    }
}

impl From<TaskAction> for AppAction {
    fn from(action: TaskAction) -> Self {
        Self::Tasks(action)
    }
}

impl From<UiAction> for AppAction {
    fn from(action: UiAction) -> Self {
        Self::Ui(action)
    }
}
