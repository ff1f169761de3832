use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{CellValue, Coordinate, Row};
use crate::editor::EditorFactory;

/// Declared column type; picks the built-in editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Numeric,
    Calendar,
    Custom,
}

/// Predicate deciding read-only state for a specific cell.
pub type ReadOnlyPredicate = Rc<dyn Fn(Coordinate) -> bool>;

/// Predicate deciding whether a candidate value may be committed.
pub type Validator = Rc<dyn Fn(&CellValue) -> bool>;

/// Read-only flag: either fixed or evaluated per cell.
#[derive(Clone, Default)]
pub enum ReadOnly {
    #[default]
    Editable,
    Always,
    When(ReadOnlyPredicate),
}

impl ReadOnly {
    pub fn is_read_only(&self, coords: Coordinate) -> bool {
        match self {
            ReadOnly::Editable => false,
            ReadOnly::Always => true,
            ReadOnly::When(predicate) => predicate(coords),
        }
    }
}

impl From<bool> for ReadOnly {
    fn from(flag: bool) -> Self {
        if flag {
            ReadOnly::Always
        } else {
            ReadOnly::Editable
        }
    }
}

impl fmt::Debug for ReadOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadOnly::Editable => f.write_str("Editable"),
            ReadOnly::Always => f.write_str("Always"),
            ReadOnly::When(_) => f.write_str("When(<predicate>)"),
        }
    }
}

/// Column configuration, owned by the host and read by index.
#[derive(Clone)]
pub struct ColumnDescriptor {
    pub id: String,
    /// Key into each [`Row`].
    pub accessor: String,
    pub column_type: ColumnType,
    pub read_only: ReadOnly,
    /// Default: every value is valid.
    pub validator: Option<Validator>,
    /// Takes precedence over `column_type` when choosing an editor.
    pub editor_factory: Option<Rc<dyn EditorFactory>>,
    pub max_length: Option<usize>,
    /// Row-selection pseudo-column; never editable.
    pub is_selection: bool,
}

impl ColumnDescriptor {
    pub fn new(id: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            accessor: accessor.into(),
            column_type: ColumnType::Text,
            read_only: ReadOnly::Editable,
            validator: None,
            editor_factory: None,
            max_length: None,
            is_selection: false,
        }
    }

    /// The row-selection checkbox column.
    pub fn selection() -> Self {
        Self {
            is_selection: true,
            ..Self::new("__selection__", "__selection__")
        }
    }

    #[must_use]
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    #[must_use]
    pub fn read_only(mut self, flag: bool) -> Self {
        self.read_only = ReadOnly::from(flag);
        self
    }

    #[must_use]
    pub fn read_only_when(mut self, predicate: impl Fn(Coordinate) -> bool + 'static) -> Self {
        self.read_only = ReadOnly::When(Rc::new(predicate));
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl Fn(&CellValue) -> bool + 'static) -> Self {
        self.validator = Some(Rc::new(validator));
        self
    }

    #[must_use]
    pub fn with_editor(mut self, factory: Rc<dyn EditorFactory>) -> Self {
        self.editor_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Value of this column on `row`; `None` means undefined.
    pub fn value_in<'r>(&self, row: &'r Row) -> Option<&'r CellValue> {
        row.get(&self.accessor)
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("accessor", &self.accessor)
            .field("column_type", &self.column_type)
            .field("read_only", &self.read_only)
            .field("validator", &self.validator.is_some())
            .field("editor_factory", &self.editor_factory.is_some())
            .field("max_length", &self.max_length)
            .field("is_selection", &self.is_selection)
            .finish()
    }
}

/// Serializable column configuration (CLI scenarios, JS hosts).
///
/// Closures cannot travel through JSON, so the validator is limited to
/// the declarative `required` rule here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnSpec {
    pub id: String,
    /// Falls back to `id` when empty.
    pub accessor: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub read_only: bool,
    pub max_length: Option<usize>,
    pub selection: bool,
    /// Reject empty strings and nulls on commit.
    pub required: bool,
}

impl ColumnSpec {
    pub fn into_descriptor(self) -> ColumnDescriptor {
        if self.selection {
            return ColumnDescriptor::selection();
        }
        let accessor = if self.accessor.is_empty() {
            self.id.clone()
        } else {
            self.accessor
        };
        let mut column = ColumnDescriptor::new(self.id, accessor)
            .with_type(self.column_type)
            .read_only(self.read_only);
        column.max_length = self.max_length;
        if self.required {
            column = column.with_validator(|value| match value {
                CellValue::Null => false,
                CellValue::String(s) => !s.trim().is_empty(),
                _ => true,
            });
        }
        column
    }
}

/// Column lookup by index, supplied by the column-configuration owner.
pub trait ColumnLookup {
    fn column_at(&self, col: usize) -> Option<&ColumnDescriptor>;
    fn column_count(&self) -> usize;
}

impl ColumnLookup for Vec<ColumnDescriptor> {
    fn column_at(&self, col: usize) -> Option<&ColumnDescriptor> {
        self.get(col)
    }

    fn column_count(&self) -> usize {
        self.len()
    }
}
