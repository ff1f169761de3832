//! Common test utilities: a grid builder and notification helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::rc::Rc;

use gridedit::coordinator::ManualScheduler;
use gridedit::data::GridData;
use gridedit::merge::MergeMap;
use gridedit::{
    CellChangeEvent, CellValue, ColumnDescriptor, Coordinate, Coordinator, GridConfig,
    Notification, Row,
};
use serde_json::json;

/// Shorthand for `Coordinate::new`.
#[must_use]
pub fn at(row: i32, col: i32) -> Coordinate {
    Coordinate::new(row, col)
}

/// Build a row from a JSON object literal.
#[must_use]
pub fn row(value: serde_json::Value) -> Row {
    value.as_object().cloned().expect("row must be a JSON object")
}

/// Rows with keys `c0..c{cols}` holding `"r{row}c{col}"`.
#[must_use]
pub fn filled_rows(rows: usize, cols: usize) -> Vec<Row> {
    (0..rows)
        .map(|r| {
            let mut map = Row::new();
            for c in 0..cols {
                map.insert(format!("c{c}"), json!(format!("r{r}c{c}")));
            }
            map
        })
        .collect()
}

/// Text columns `c0..c{cols}` with matching accessors.
#[must_use]
pub fn text_columns(cols: usize) -> Vec<ColumnDescriptor> {
    (0..cols)
        .map(|c| ColumnDescriptor::new(format!("c{c}"), format!("c{c}")))
        .collect()
}

/// Builder for a coordinator wired to a [`ManualScheduler`].
pub struct GridBuilder {
    config: GridConfig,
    rows: Vec<Row>,
    columns: Vec<ColumnDescriptor>,
    merges: Vec<(i32, i32, i32, i32)>,
    focus: Option<Coordinate>,
}

impl GridBuilder {
    /// A `rows` x `cols` grid of text cells, every cell filled.
    #[must_use]
    pub fn filled(rows: usize, cols: usize) -> Self {
        Self {
            config: GridConfig::default(),
            rows: filled_rows(rows, cols),
            columns: text_columns(cols),
            merges: Vec::new(),
            focus: None,
        }
    }

    /// A `rows` x `cols` grid whose rows carry no values.
    #[must_use]
    pub fn empty_cells(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![Row::new(); rows],
            ..Self::filled(0, cols)
        }
    }

    #[must_use]
    pub fn rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// Replace column `idx`.
    #[must_use]
    pub fn column(mut self, idx: usize, column: ColumnDescriptor) -> Self {
        self.columns[idx] = column;
        self
    }

    /// Merge the inclusive rectangle `(r0, c0)..(r1, c1)`.
    #[must_use]
    pub fn merge(mut self, r0: i32, c0: i32, r1: i32, c1: i32) -> Self {
        self.merges.push((r0, c0, r1, c1));
        self
    }

    #[must_use]
    pub fn focus(mut self, row: i32, col: i32) -> Self {
        self.focus = Some(at(row, col));
        self
    }

    #[must_use]
    pub fn commit_on_move(mut self) -> Self {
        self.config.commit_on_move = true;
        self
    }

    #[must_use]
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the coordinator and return a handle to its timer queue.
    #[must_use]
    pub fn build(self) -> (Coordinator, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let data = GridData::new(Rc::new(self.rows), Rc::new(self.columns));
        let mut grid = Coordinator::new(self.config, data, Box::new(scheduler.clone()))
            .with_merges(Rc::new(MergeMap::from_ranges(&self.merges)));
        if let Some(focus) = self.focus {
            grid = grid.with_initial_focus(focus);
        }
        (grid, scheduler)
    }
}

/// Fire every due timer, like the browser event loop would.
pub fn fire_timers(grid: &mut Coordinator, scheduler: &ManualScheduler) {
    for id in scheduler.take_due() {
        grid.run_deferred(id);
    }
}

/// Only the cell-change events among `notes`.
#[must_use]
pub fn changes(notes: &[Notification]) -> Vec<CellChangeEvent> {
    notes
        .iter()
        .filter_map(|n| match n {
            Notification::CellChange(event) => Some(event.clone()),
            _ => None,
        })
        .collect()
}

#[must_use]
pub fn change(coords: Coordinate, previous: CellValue, new: CellValue) -> Notification {
    Notification::CellChange(CellChangeEvent {
        coords,
        previous_value: previous,
        new_value: new,
    })
}

#[must_use]
pub fn begin(coords: Coordinate) -> Notification {
    Notification::BeginEditing { coords }
}

#[must_use]
pub fn stop(coords: Coordinate) -> Notification {
    Notification::StopEditing { coords }
}
