//! JavaScript surface for the coordinator.
//!
//! `GridEditor` is what the rendering layer holds. It forwards commands to
//! a shared [`Coordinator`] and, once the coordinator borrow is released,
//! hands queued notifications to the registered callbacks. Callbacks may
//! therefore call back into `GridEditor` without a double borrow.

mod columns;
mod timer;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::GridConfig;
use crate::coordinator::{Coordinator, KeyModifiers, TimerId};
use crate::data::GridData;
use crate::merge::MergeMap;
use crate::types::{AnchorRect, ColumnDescriptor, Coordinate, Delta, Notification, Row};

use timer::TimeoutScheduler;

/// Serialize with plain objects for maps, the shape JS code expects.
pub(crate) fn to_js<T: Serialize + ?Sized>(
    value: &T,
) -> std::result::Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

#[derive(Clone, Default)]
struct Callbacks {
    on_begin_editing: Option<Function>,
    on_stop_editing: Option<Function>,
    on_cell_change: Option<Function>,
}

impl Callbacks {
    fn dispatch(&self, notifications: &[Notification]) {
        for note in notifications {
            let (callback, payload) = match note {
                Notification::BeginEditing { coords } => (&self.on_begin_editing, to_js(coords)),
                Notification::StopEditing { coords } => (&self.on_stop_editing, to_js(coords)),
                Notification::CellChange(event) => (&self.on_cell_change, to_js(event)),
            };
            let Some(callback) = callback else {
                continue;
            };
            match payload {
                Ok(payload) => {
                    if let Err(e) = callback.call1(&JsValue::NULL, &payload) {
                        tracing::warn!(error = ?e, "notification callback threw");
                    }
                }
                Err(e) => tracing::error!(error = %e, "failed to serialize notification"),
            }
        }
    }
}

pub(crate) struct SharedState {
    coordinator: Coordinator,
    callbacks: Callbacks,
}

impl SharedState {
    /// Drain notifications and invoke callbacks outside the borrow.
    fn flush(state: &Rc<RefCell<SharedState>>) {
        let (notifications, callbacks) = {
            let mut s = state.borrow_mut();
            (s.coordinator.take_notifications(), s.callbacks.clone())
        };
        if !notifications.is_empty() {
            callbacks.dispatch(&notifications);
        }
    }

    /// Timer entry point for deferred commands.
    pub(crate) fn fire(target: &Weak<RefCell<SharedState>>, id: TimerId) {
        let Some(state) = target.upgrade() else {
            return;
        };
        let ran = match state.try_borrow_mut() {
            Ok(mut s) => s.coordinator.run_deferred(id),
            Err(_) => {
                tracing::warn!(id, "deferred command fired during a command; skipped");
                false
            }
        };
        if ran {
            Self::flush(&state);
        }
    }
}

/// The grid coordinator exported to JavaScript.
#[wasm_bindgen]
pub struct GridEditor {
    state: Rc<RefCell<SharedState>>,
}

impl GridEditor {
    /// Run a command, then deliver whatever it queued.
    fn with<R>(&self, f: impl FnOnce(&mut Coordinator) -> R) -> R {
        let result = {
            let mut s = self.state.borrow_mut();
            f(&mut s.coordinator)
        };
        SharedState::flush(&self.state);
        result
    }
}

#[wasm_bindgen]
impl GridEditor {
    /// Create a coordinator from an optional config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<GridEditor, JsValue> {
        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.validate()?;
        crate::logging::init(&config.log_filter);

        let state = Rc::new_cyclic(|weak: &Weak<RefCell<SharedState>>| {
            let scheduler = TimeoutScheduler::new(Weak::clone(weak));
            RefCell::new(SharedState {
                coordinator: Coordinator::new(config, GridData::empty(), Box::new(scheduler)),
                callbacks: Callbacks::default(),
            })
        });
        Ok(GridEditor { state })
    }

    // ---- Data ----

    /// Replace the rows (array of plain objects keyed by accessor).
    #[wasm_bindgen(js_name = "setRows")]
    pub fn set_rows(&self, rows: JsValue) {
        match serde_wasm_bindgen::from_value::<Vec<Row>>(rows) {
            Ok(rows) => self.with(|c| c.set_rows(Rc::new(rows))),
            Err(e) => tracing::error!(error = %e, "setRows: rows must be an array of objects"),
        }
    }

    /// Replace the column configuration (array of column objects).
    #[wasm_bindgen(js_name = "setColumns")]
    pub fn set_columns(&self, specs: js_sys::Array) {
        let mut parsed: Vec<ColumnDescriptor> = Vec::new();
        for (idx, obj) in specs.iter().enumerate() {
            match columns::column_from_js(&obj) {
                Ok(column) => parsed.push(column),
                Err(e) => {
                    tracing::error!(idx, error = %e, "setColumns: invalid column; keeping previous columns");
                    return;
                }
            }
        }
        self.with(|c| c.set_columns(Rc::new(parsed)));
    }

    /// Replace merged regions, given as A1 ranges (`"A1:B2"`).
    #[wasm_bindgen(js_name = "setMerges")]
    pub fn set_merges(&self, ranges: Vec<String>) {
        let map = MergeMap::from_a1(&ranges);
        self.with(|c| c.set_merges(Rc::new(map)));
    }

    // ---- Commands ----

    #[wasm_bindgen(js_name = "moveTo")]
    pub fn move_to(&self, row: i32, col: i32) -> bool {
        self.with(|c| c.move_to(Coordinate::new(row, col)).is_some())
    }

    #[wasm_bindgen(js_name = "moveBy")]
    pub fn move_by(&self, rows: i32, cols: i32) -> bool {
        self.with(|c| c.move_by(Delta::new(rows, cols)).is_some())
    }

    /// `anchor` is `[x, y, width, height]` of the cell in CSS pixels.
    #[wasm_bindgen(js_name = "beginEditing")]
    pub fn begin_editing(
        &self,
        row: i32,
        col: i32,
        anchor: Option<Vec<f32>>,
        default_key: Option<String>,
    ) -> bool {
        let anchor = anchor.map(|rect| AnchorRect {
            x: rect.first().copied().unwrap_or(0.0),
            y: rect.get(1).copied().unwrap_or(0.0),
            width: rect.get(2).copied().unwrap_or(0.0),
            height: rect.get(3).copied().unwrap_or(0.0),
        });
        self.with(|c| c.begin_editing(Coordinate::new(row, col), anchor, default_key.as_deref()))
    }

    /// Close the editor; `save` defaults to true.
    #[wasm_bindgen(js_name = "stopEditing")]
    pub fn stop_editing(&self, save: Option<bool>) {
        self.with(|c| {
            c.stop_editing(save.unwrap_or(true));
        });
    }

    #[wasm_bindgen(js_name = "setEditorInput")]
    pub fn set_editor_input(&self, input: &str) -> bool {
        self.with(|c| c.update_editor_input(input))
    }

    /// Returns true if the key was consumed (caller should `preventDefault()`).
    #[wasm_bindgen(js_name = "handleKey")]
    pub fn handle_key(&self, key: &str, shift: bool, ctrl: bool, alt: bool) -> bool {
        self.with(|c| c.handle_key(key, KeyModifiers { shift, ctrl, alt }))
    }

    /// Cancel pending deferred navigation and discard any open editor.
    pub fn teardown(&self) {
        self.with(Coordinator::teardown);
    }

    // ---- Notifications ----

    #[wasm_bindgen(js_name = "onBeginEditing")]
    pub fn on_begin_editing(&self, callback: Option<Function>) {
        self.state.borrow_mut().callbacks.on_begin_editing = callback;
    }

    #[wasm_bindgen(js_name = "onStopEditing")]
    pub fn on_stop_editing(&self, callback: Option<Function>) {
        self.state.borrow_mut().callbacks.on_stop_editing = callback;
    }

    #[wasm_bindgen(js_name = "onCellChange")]
    pub fn on_cell_change(&self, callback: Option<Function>) {
        self.state.borrow_mut().callbacks.on_cell_change = callback;
    }

    // ---- Queries ----

    /// Live session snapshot, or `null`.
    #[wasm_bindgen(js_name = "getEditorState")]
    pub fn get_editor_state(&self) -> JsValue {
        let snapshot = self.state.borrow().coordinator.editor_snapshot();
        match snapshot.map(|s| to_js(&s)) {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                tracing::error!(error = %e, "failed to serialize editor state");
                JsValue::NULL
            }
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = "isEditing")]
    pub fn is_editing(&self) -> bool {
        self.state.borrow().coordinator.is_editing()
    }

    /// Focused cell as `[row, col]` (`[-1, -1]` when nothing is focused).
    pub fn focused(&self) -> Vec<i32> {
        let focused = self.state.borrow().coordinator.focused();
        vec![focused.row_index, focused.col_index]
    }

    /// Text to show in the open editor.
    #[wasm_bindgen(js_name = "editorDisplay")]
    pub fn editor_display(&self) -> Option<String> {
        self.state.borrow().coordinator.editor_display()
    }
}

impl Drop for GridEditor {
    fn drop(&mut self) {
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.coordinator.teardown();
        }
    }
}
