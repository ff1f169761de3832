//! The edit-session state machine: Idle, or Editing exactly one cell.

use std::fmt;

use super::{CellEditor, EditorContext, EditorKind};
use crate::data::GridData;
use crate::error::{GridError, Result};
use crate::types::{
    display_value, AnchorRect, CellChangeEvent, CellValue, Coordinate, Notification, Validator,
};

/// A live edit of one cell.
pub struct EditSession {
    coords: Coordinate,
    initial_value: CellValue,
    editor: Box<dyn CellEditor>,
    kind: EditorKind,
    validator: Option<Validator>,
    anchor: Option<AnchorRect>,
}

impl EditSession {
    pub fn coords(&self) -> Coordinate {
        self.coords
    }

    /// Cell value when the session opened (`""` for an empty cell).
    pub fn initial_value(&self) -> &CellValue {
        &self.initial_value
    }

    pub fn kind(&self) -> &EditorKind {
        &self.kind
    }

    pub fn is_modal(&self) -> bool {
        self.kind.is_modal()
    }

    pub fn anchor(&self) -> Option<AnchorRect> {
        self.anchor
    }

    pub fn editor(&self) -> &dyn CellEditor {
        self.editor.as_ref()
    }

    fn is_valid(&self, candidate: &CellValue) -> bool {
        self.validator.as_ref().map_or(true, |validate| validate(candidate))
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("coords", &self.coords)
            .field("initial_value", &self.initial_value)
            .field("kind", &self.kind)
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

/// A request to open an editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeginEditing {
    /// Already merge-resolved.
    pub coords: Coordinate,
    pub anchor: Option<AnchorRect>,
    /// Key that started the edit; appended to the current value.
    pub default_key: Option<String>,
}

/// How a `begin` call ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    Started,
    /// Same cell is already being edited.
    AlreadyEditing,
    /// Row-selection column.
    NotEditable,
    ReadOnly,
}

/// How a `stop` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    Committed(CellChangeEvent),
    /// Valid value equal to the initial one.
    Unchanged,
    /// Editor had nothing committable.
    NoValue,
    Invalid,
    Discarded,
}

/// Owns the single edit-session slot.
#[derive(Debug, Default)]
pub struct EditSessionManager {
    session: Option<EditSession>,
}

impl EditSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn editing_at(&self, coords: Coordinate) -> bool {
        self.session.as_ref().is_some_and(|s| s.coords == coords)
    }

    /// Open an editor at `request.coords`.
    ///
    /// A different live session is closed with `replace_save` only after
    /// the new one is known to be openable, so rejected requests leave the
    /// old session running.
    pub fn begin(
        &mut self,
        request: BeginEditing,
        data: &GridData,
        replace_save: bool,
        out: &mut Vec<Notification>,
    ) -> Result<BeginOutcome> {
        let coords = request.coords;
        if self.editing_at(coords) {
            return Ok(BeginOutcome::AlreadyEditing);
        }

        let column = data
            .column(coords.col_index)
            .ok_or(GridError::ColumnNotFound(coords.col_index))?;
        if column.is_selection {
            return Ok(BeginOutcome::NotEditable);
        }
        if column.read_only.is_read_only(coords) {
            return Ok(BeginOutcome::ReadOnly);
        }
        let row = data
            .row(coords.row_index)
            .ok_or(GridError::RowNotFound(coords.row_index))?;

        let current = column.value_in(row).filter(|v| !v.is_null());
        let initial_input = match (&request.default_key, current) {
            (Some(key), Some(value)) => format!("{}{key}", display_value(value)),
            (Some(key), None) => key.clone(),
            (None, Some(value)) => display_value(value),
            (None, None) => String::new(),
        };
        let initial_value = current
            .cloned()
            .unwrap_or_else(|| CellValue::String(String::new()));

        let kind = EditorKind::for_column(column);
        let editor = kind.instantiate(&EditorContext {
            coords,
            initial_input,
            max_length: column.max_length,
        })?;
        let validator = column.validator.clone();

        self.stop(replace_save, out);

        tracing::debug!(%coords, kind = kind.name(), "begin editing");
        self.session = Some(EditSession {
            coords,
            initial_value,
            editor,
            kind,
            validator,
            anchor: request.anchor,
        });
        out.push(Notification::BeginEditing { coords });
        Ok(BeginOutcome::Started)
    }

    /// Close the live session. Returns `None` when already idle.
    ///
    /// `StopEditing` is always queued, after any `CellChange`.
    pub fn stop(&mut self, save: bool, out: &mut Vec<Notification>) -> Option<StopOutcome> {
        let session = self.session.take()?;
        let coords = session.coords;

        let outcome = if save {
            match session.editor.value() {
                None => StopOutcome::NoValue,
                Some(candidate) if !session.is_valid(&candidate) => StopOutcome::Invalid,
                Some(candidate) if candidate == session.initial_value => StopOutcome::Unchanged,
                Some(candidate) => StopOutcome::Committed(CellChangeEvent {
                    coords,
                    previous_value: session.initial_value,
                    new_value: candidate,
                }),
            }
        } else {
            StopOutcome::Discarded
        };

        tracing::debug!(%coords, ?outcome, "stop editing");
        if let StopOutcome::Committed(event) = &outcome {
            out.push(Notification::CellChange(event.clone()));
        }
        out.push(Notification::StopEditing { coords });
        Some(outcome)
    }

    /// Forward typed text into the live editor. Returns false when idle.
    pub fn update_input(&mut self, input: &str) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.editor.set_input(input);
                true
            }
            None => false,
        }
    }
}
