//! gridedit - cell navigation and editing for web spreadsheet grids
//!
//! The state machine that sits between a virtualized grid renderer and
//! the host application's data:
//! - Focused-cell tracking with bounds rejection
//! - Merged cells that always resolve to their anchor
//! - A single edit session with per-column editors and validation
//! - Cell-change notifications for the host's data store
//! - Session invalidation when rows or columns disappear
//!
//! Rendering, virtualization, and styling belong to the JavaScript side.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridEditor } from 'gridedit';
//! await init();
//! const grid = new GridEditor({ commitOnMove: false });
//! grid.setColumns([{ id: 'name' }, { id: 'qty', type: 'numeric' }]);
//! grid.setRows(rows);
//! grid.onCellChange(({ coords, newValue }) => store.update(coords, newValue));
//! grid.moveTo(0, 0);
//! ```

pub mod cell_ref;
pub mod config;
pub mod coordinator;
pub mod data;
pub mod editor;
pub mod error;
pub mod logging;
pub mod merge;
pub mod navigation;
pub mod types;

// JavaScript bindings
#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use coordinator::Coordinator;
#[cfg(target_arch = "wasm32")]
pub use web::GridEditor;

pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
