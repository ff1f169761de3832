//! Coordinator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Behaviour switches for the coordinator.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Commit (instead of discard) a live edit when focus moves away.
    pub commit_on_move: bool,
    /// Delay before a navigation key that closed an editor is replayed.
    pub deferred_move_delay_ms: u32,
    /// Enter commits and moves down (Shift+Enter moves up).
    pub enter_moves_down: bool,
    /// `tracing` filter directive used by [`crate::logging::init`].
    pub log_filter: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            commit_on_move: false,
            deferred_move_delay_ms: 10,
            enter_moves_down: true,
            log_filter: "warn".to_string(),
        }
    }
}

impl GridConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values `serde` accepts but the coordinator cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.log_filter.trim().is_empty() {
            return Err(GridError::Config("logFilter must not be empty".into()));
        }
        Ok(())
    }
}
