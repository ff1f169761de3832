use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell position in the grid.
///
/// `-1` on either axis means "no selection"; see [`Coordinate::NONE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub row_index: i32,
    pub col_index: i32,
}

impl Coordinate {
    /// The "nothing focused" coordinate.
    pub const NONE: Coordinate = Coordinate {
        row_index: -1,
        col_index: -1,
    };

    pub const fn new(row_index: i32, col_index: i32) -> Self {
        Self {
            row_index,
            col_index,
        }
    }

    /// True if either axis is `-1`.
    pub fn is_none(self) -> bool {
        self.row_index < 0 || self.col_index < 0
    }

    /// Row index as `usize`, or `None` for negative indices.
    pub fn row(self) -> Option<usize> {
        usize::try_from(self.row_index).ok()
    }

    /// Column index as `usize`, or `None` for negative indices.
    pub fn col(self) -> Option<usize> {
        usize::try_from(self.col_index).ok()
    }

    /// Offset by a delta, saturating at the `i32` range.
    pub fn offset(self, delta: Delta) -> Self {
        Self {
            row_index: self.row_index.saturating_add(delta.rows),
            col_index: self.col_index.saturating_add(delta.cols),
        }
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row_index, self.col_index)
    }
}

/// A relative movement in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Delta {
    pub rows: i32,
    pub cols: i32,
}

impl Delta {
    pub const UP: Delta = Delta::new(-1, 0);
    pub const DOWN: Delta = Delta::new(1, 0);
    pub const LEFT: Delta = Delta::new(0, -1);
    pub const RIGHT: Delta = Delta::new(0, 1);

    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }
}

/// Inclusive navigation limits: `[0, max_row] x [0, max_col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBounds {
    pub max_row: i32,
    pub max_col: i32,
}

impl GridBounds {
    pub const fn new(max_row: i32, max_col: i32) -> Self {
        Self { max_row, max_col }
    }

    /// Bounds for a grid of `rows` x `cols` cells, or `None` if either is empty.
    pub fn from_counts(rows: usize, cols: usize) -> Option<Self> {
        let max_row = i32::try_from(rows.checked_sub(1)?).ok()?;
        let max_col = i32::try_from(cols.checked_sub(1)?).ok()?;
        Some(Self { max_row, max_col })
    }

    pub fn contains(self, coord: Coordinate) -> bool {
        (0..=self.max_row).contains(&coord.row_index) && (0..=self.max_col).contains(&coord.col_index)
    }

    /// Nearest in-bounds coordinate.
    pub fn clamp(self, coord: Coordinate) -> Coordinate {
        Coordinate {
            row_index: coord.row_index.clamp(0, self.max_row.max(0)),
            col_index: coord.col_index.clamp(0, self.max_col.max(0)),
        }
    }
}

/// Opaque on-screen rectangle the editor is positioned against.
///
/// Supplied by the rendering layer in logical (CSS) pixels; the
/// coordinator stores it on the session but never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnchorRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
