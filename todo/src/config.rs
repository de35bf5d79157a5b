//! Configuration management for the to-do app.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::TodoError;
use pocket_todo_runtime::StoreConfig;
use std::env;

/// Log filter directive variable
pub const LOG_ENV: &str = "POCKET_TODO_LOG";
/// Action broadcast capacity variable
pub const ACTION_BUFFER_ENV: &str = "POCKET_TODO_ACTION_BUFFER";
/// Filter used when [`LOG_ENV`] is unset
pub const DEFAULT_LOG_FILTER: &str = "pocket_todo=info,pocket_todo_runtime=info";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `tracing-subscriber` `EnvFilter` directives
    pub log_filter: String,
    /// Store tuning
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::InvalidConfig`] if a variable is set to an
    /// unusable value.
    pub fn from_env() -> Result<Self, TodoError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset or blank variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::InvalidConfig`] if the action buffer is not a
    /// positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TodoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_filter = read(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let store = match read(ACTION_BUFFER_ENV) {
            Some(raw) => {
                let capacity = raw
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|capacity| *capacity > 0)
                    .ok_or_else(|| TodoError::InvalidConfig {
                        key: ACTION_BUFFER_ENV,
                        value: raw.clone(),
                    })?;
                StoreConfig::default().with_action_broadcast_capacity(capacity)
            },
            None => StoreConfig::default(),
        };

        Ok(Self { log_filter, store })
    }
}
