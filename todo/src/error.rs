//! Errors at the edges of the app.
//!
//! Reducers never fail; these only come from configuration loading and
//! state export.

use thiserror::Error;

/// Errors surfaced by the to-do app
#[derive(Error, Debug)]
pub enum TodoError {
    /// State could not be serialized
    #[error("Failed to serialize state snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A configuration variable held an unusable value
    #[error("Invalid value {value:?} for {key}")]
    InvalidConfig {
        /// Environment variable name
        key: &'static str,
        /// Value as found
        value: String,
    },
}
