//! Snapshot of the host's rows and column configuration.

use std::rc::Rc;

use crate::types::{CellValue, ColumnDescriptor, ColumnLookup, Coordinate, GridBounds, Row};

/// Rows plus column lookup, both owned by the host and shared by `Rc`.
///
/// Replacing either with a different `Rc` is what the reconciler treats
/// as a data change.
#[derive(Clone)]
pub struct GridData {
    rows: Rc<Vec<Row>>,
    columns: Rc<dyn ColumnLookup>,
}

impl GridData {
    pub fn new(rows: Rc<Vec<Row>>, columns: Rc<dyn ColumnLookup>) -> Self {
        Self { rows, columns }
    }

    pub fn empty() -> Self {
        Self::new(Rc::new(Vec::new()), Rc::new(Vec::<ColumnDescriptor>::new()))
    }

    pub fn row(&self, row: i32) -> Option<&Row> {
        self.rows.get(usize::try_from(row).ok()?)
    }

    pub fn column(&self, col: i32) -> Option<&ColumnDescriptor> {
        self.columns.column_at(usize::try_from(col).ok()?)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.column_count()
    }

    /// Navigation bounds, or `None` when there are no rows or no columns.
    pub fn bounds(&self) -> Option<GridBounds> {
        GridBounds::from_counts(self.row_count(), self.column_count())
    }

    /// Cell value at `coords`; `None` if the row, column, or key is missing.
    pub fn value_at(&self, coords: Coordinate) -> Option<&CellValue> {
        let column = self.column(coords.col_index)?;
        column.value_in(self.row(coords.row_index)?)
    }

    /// Swap in new rows. Returns true if the row set changed identity.
    pub fn set_rows(&mut self, rows: Rc<Vec<Row>>) -> bool {
        if Rc::ptr_eq(&self.rows, &rows) {
            return false;
        }
        self.rows = rows;
        true
    }

    /// Swap in a new column lookup. Returns true if it changed identity.
    pub fn set_columns(&mut self, columns: Rc<dyn ColumnLookup>) -> bool {
        if Rc::ptr_eq(&self.columns, &columns) {
            return false;
        }
        self.columns = columns;
        true
    }

    pub fn rows(&self) -> &Rc<Vec<Row>> {
        &self.rows
    }
}

impl Default for GridData {
    fn default() -> Self {
        Self::empty()
    }
}
