//! Column configuration coming from JavaScript.
//!
//! Plain fields go through [`ColumnSpec`]. Function-valued fields are
//! picked off with `Reflect` first:
//! - `readOnly(rowIndex, colIndex)` predicate
//! - `validator(value)` predicate
//! - `editor(initialInput, coords)` factory returning `{ getValue(), setValue?(text) }`

use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::editor::{CellEditor, EditorContext, EditorFactory};
use crate::error::{GridError, Result};
use crate::types::{display_value, CellValue, ColumnDescriptor, ColumnSpec, Coordinate};

fn function_prop(obj: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

/// Convert one JS column object into a descriptor.
pub(crate) fn column_from_js(obj: &JsValue) -> Result<ColumnDescriptor> {
    let read_only = function_prop(obj, "readOnly");
    let validator = function_prop(obj, "validator");
    let editor = function_prop(obj, "editor");
    let modal = Reflect::get(obj, &JsValue::from_str("editorModal"))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    // Copy without the function-valued fields so serde sees only data.
    let plain = Object::assign(&Object::new(), obj.unchecked_ref());
    for name in ["readOnly", "validator", "editor"] {
        if function_prop(obj, name).is_some() {
            if let Err(e) = Reflect::delete_property(&plain, &JsValue::from_str(name)) {
                tracing::warn!(name, error = ?e, "could not strip function field from column copy");
            }
        }
    }
    let spec: ColumnSpec = serde_wasm_bindgen::from_value(plain.into())
        .map_err(|e| GridError::Config(e.to_string()))?;

    let mut column = spec.into_descriptor();
    if let Some(predicate) = read_only {
        column = column.read_only_when(move |c: Coordinate| {
            match predicate.call2(
                &JsValue::NULL,
                &JsValue::from(c.row_index),
                &JsValue::from(c.col_index),
            ) {
                Ok(v) => v.is_truthy(),
                Err(e) => {
                    tracing::warn!(error = ?e, "readOnly predicate threw; treating cell as read-only");
                    true
                }
            }
        });
    }
    if let Some(validate) = validator {
        column = column.with_validator(move |value: &CellValue| {
            let Ok(arg) = super::to_js(value) else {
                return false;
            };
            match validate.call1(&JsValue::NULL, &arg) {
                Ok(v) => v.is_truthy(),
                Err(e) => {
                    tracing::warn!(error = ?e, "validator threw; rejecting value");
                    false
                }
            }
        });
    }
    if let Some(create) = editor {
        column = column.with_editor(Rc::new(JsEditorFactory { create, modal }));
    }
    Ok(column)
}

struct JsEditorFactory {
    create: Function,
    modal: bool,
}

impl EditorFactory for JsEditorFactory {
    fn create(&self, ctx: &EditorContext) -> Result<Box<dyn CellEditor>> {
        let malformed = |reason: String| GridError::MalformedEditor {
            coords: ctx.coords,
            reason,
        };
        let coords = super::to_js(&ctx.coords)
            .map_err(|e| malformed(e.to_string()))?;
        let handle = self
            .create
            .call2(&JsValue::NULL, &JsValue::from_str(&ctx.initial_input), &coords)
            .map_err(|e| malformed(format!("editor factory threw: {e:?}")))?;
        let get_value = function_prop(&handle, "getValue")
            .ok_or_else(|| malformed("editor has no getValue()".into()))?;
        let set_value = function_prop(&handle, "setValue");
        Ok(Box::new(JsEditor {
            handle,
            get_value,
            set_value,
            input: ctx.initial_input.clone(),
        }))
    }

    fn is_modal(&self) -> bool {
        self.modal
    }
}

struct JsEditor {
    handle: JsValue,
    get_value: Function,
    set_value: Option<Function>,
    input: String,
}

impl CellEditor for JsEditor {
    fn value(&self) -> Option<CellValue> {
        let value = self.get_value.call0(&self.handle).ok()?;
        if value.is_undefined() {
            return None;
        }
        serde_wasm_bindgen::from_value(value).ok()
    }

    fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
        if let Some(set_value) = &self.set_value {
            if let Err(e) = set_value.call1(&self.handle, &JsValue::from_str(input)) {
                tracing::warn!(error = ?e, "editor setValue threw; keeping buffered input");
            }
        }
    }

    fn display(&self) -> String {
        self.value()
            .map(|v| display_value(&v))
            .unwrap_or_else(|| self.input.clone())
    }
}
