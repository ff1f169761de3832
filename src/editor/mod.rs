//! Cell editors and the edit-session state machine.
//!
//! An editor is anything implementing [`CellEditor`]: it buffers user input
//! and can synchronously report the value it would commit. Which editor a
//! cell gets is decided once per session by [`EditorKind::for_column`].

mod builtin;
mod session;

use std::fmt;
use std::rc::Rc;

pub use builtin::{CalendarEditor, NumericEditor, TextEditor, CALENDAR_FORMAT};
pub use session::{BeginEditing, BeginOutcome, EditSession, EditSessionManager, StopOutcome};

use crate::error::Result;
use crate::types::{CellValue, ColumnDescriptor, ColumnType, Coordinate};

/// Capability every editor must provide.
pub trait CellEditor {
    /// The value to commit, or `None` if the input cannot be committed
    /// (the session is then closed as a cancel).
    fn value(&self) -> Option<CellValue>;

    /// Replace the buffered input with what the user typed.
    fn set_input(&mut self, input: &str);

    /// Text the rendering layer should show in the editor.
    fn display(&self) -> String;
}

/// What an editor is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContext {
    pub coords: Coordinate,
    /// Initial buffer text (current value, possibly with the typed key).
    pub initial_input: String,
    pub max_length: Option<usize>,
}

/// Column-supplied editor constructor.
///
/// Returning an error rejects the edit; nothing is opened.
pub trait EditorFactory {
    fn create(&self, ctx: &EditorContext) -> Result<Box<dyn CellEditor>>;

    /// Whether the editor is a popup that keeps arrow keys for itself.
    fn is_modal(&self) -> bool {
        false
    }
}

/// Editor implementation chosen for a session.
#[derive(Clone)]
pub enum EditorKind {
    Text,
    Numeric,
    Calendar,
    Custom(Rc<dyn EditorFactory>),
}

impl EditorKind {
    /// A column factory wins; otherwise the declared type decides.
    pub fn for_column(column: &ColumnDescriptor) -> Self {
        if let Some(factory) = &column.editor_factory {
            return EditorKind::Custom(Rc::clone(factory));
        }
        match column.column_type {
            ColumnType::Calendar => EditorKind::Calendar,
            ColumnType::Numeric => EditorKind::Numeric,
            ColumnType::Text | ColumnType::Custom => EditorKind::Text,
        }
    }

    pub fn instantiate(&self, ctx: &EditorContext) -> Result<Box<dyn CellEditor>> {
        Ok(match self {
            EditorKind::Text => Box::new(TextEditor::new(ctx)),
            EditorKind::Numeric => Box::new(NumericEditor::new(ctx)),
            EditorKind::Calendar => Box::new(CalendarEditor::new(ctx)),
            EditorKind::Custom(factory) => factory.create(ctx)?,
        })
    }

    pub fn is_modal(&self) -> bool {
        match self {
            EditorKind::Calendar => true,
            EditorKind::Custom(factory) => factory.is_modal(),
            EditorKind::Text | EditorKind::Numeric => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorKind::Text => "text",
            EditorKind::Numeric => "numeric",
            EditorKind::Calendar => "calendar",
            EditorKind::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
