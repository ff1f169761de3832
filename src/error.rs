//! Structured error types for gridedit.
//!
//! These never cross the command surface: `Coordinator` logs them and
//! turns the command into a no-op.

use crate::types::Coordinate;

/// All errors that can occur while coordinating navigation and editing.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// No column descriptor at the requested index.
    #[error("Column not found at index {0}")]
    ColumnNotFound(i32),

    /// No row at the requested index.
    #[error("Row not found at index {0}")]
    RowNotFound(i32),

    /// An editor factory produced something that cannot act as an editor.
    #[error("Malformed editor for {coords}: {reason}")]
    MalformedEditor { coords: Coordinate, reason: String },

    /// Merge configuration reports membership without a usable anchor.
    #[error("Merge configuration inconsistent at {0}")]
    MergeInconsistent(Coordinate),

    /// Invalid merge range.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
