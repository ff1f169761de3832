//! Merged-cell resolution.
//!
//! Every cell inside a merged region resolves to the region's anchor (its
//! top-left cell). The merge configuration itself is external and sits
//! behind [`MergeConfig`]; [`MergeMap`] is the built-in implementation.

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::cell_ref::parse_cell_range;
use crate::error::{GridError, Result};
use crate::types::Coordinate;

/// Largest region accepted; every member cell gets a lookup entry.
pub const MAX_REGION_CELLS: i64 = 1 << 20;

/// A merged rectangle anchored at its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRegion {
    pub anchor: Coordinate,
    /// Number of rows covered (>= 1)
    pub row_span: i32,
    /// Number of columns covered (>= 1)
    pub col_span: i32,
}

impl MergeRegion {
    /// Region covering `start..=end` (inclusive corners).
    pub fn from_corners(start: Coordinate, end: Coordinate) -> Result<Self> {
        if start.is_none() || end.row_index < start.row_index || end.col_index < start.col_index {
            return Err(GridError::InvalidRange(format!("{start}..{end}")));
        }
        let span = |from: i32, to: i32| {
            to.checked_sub(from)
                .and_then(|d| d.checked_add(1))
                .ok_or_else(|| GridError::InvalidRange(format!("{start}..{end} is too large")))
        };
        let region = Self {
            anchor: start,
            row_span: span(start.row_index, end.row_index)?,
            col_span: span(start.col_index, end.col_index)?,
        };
        if region.cell_count() > MAX_REGION_CELLS {
            return Err(GridError::InvalidRange(format!(
                "{start}..{end} covers more than {MAX_REGION_CELLS} cells"
            )));
        }
        Ok(region)
    }

    /// Bottom-right cell of the region, saturating at the `i32` range.
    pub fn last(&self) -> Coordinate {
        Coordinate::new(
            self.anchor
                .row_index
                .saturating_add(self.row_span.saturating_sub(1)),
            self.anchor
                .col_index
                .saturating_add(self.col_span.saturating_sub(1)),
        )
    }

    fn cell_count(&self) -> i64 {
        i64::from(self.row_span).saturating_mul(i64::from(self.col_span))
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        let last = self.last();
        (self.anchor.row_index..=last.row_index).contains(&coord.row_index)
            && (self.anchor.col_index..=last.col_index).contains(&coord.col_index)
    }

    /// Every coordinate in the region, anchor first.
    pub fn spanning(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let last = self.last();
        (self.anchor.row_index..=last.row_index).flat_map(move |row| {
            (self.anchor.col_index..=last.col_index).map(move |col| Coordinate::new(row, col))
        })
    }

    fn overlaps(&self, other: &MergeRegion) -> bool {
        let (a, b) = (self.last(), other.last());
        self.anchor.row_index <= b.row_index
            && other.anchor.row_index <= a.row_index
            && self.anchor.col_index <= b.col_index
            && other.anchor.col_index <= a.col_index
    }
}

/// What the merge configuration knows about a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Unmerged,
    /// Part of a region; `anchor` is `None` when the configuration lost track of it.
    Member { anchor: Option<Coordinate> },
}

/// External merge configuration.
pub trait MergeConfig {
    fn membership(&self, coord: Coordinate) -> Membership;

    /// The full region containing `coord`, when the configuration can tell.
    fn region_at(&self, _coord: Coordinate) -> Option<MergeRegion> {
        None
    }
}

/// Configuration with no merged cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMerges;

impl MergeConfig for NoMerges {
    fn membership(&self, _coord: Coordinate) -> Membership {
        Membership::Unmerged
    }
}

/// Merge lookup keyed by every member coordinate.
#[derive(Debug, Clone, Default)]
pub struct MergeMap {
    regions: Vec<MergeRegion>,
    /// Member coordinate -> index into `regions`
    members: HashMap<Coordinate, usize>,
}

impl MergeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(start_row, start_col, end_row, end_col)` rectangles.
    ///
    /// Inverted rectangles and rectangles overlapping an earlier one are
    /// skipped with a warning.
    pub fn from_ranges(ranges: &[(i32, i32, i32, i32)]) -> Self {
        let mut map = Self::new();
        for &(start_row, start_col, end_row, end_col) in ranges {
            let region = MergeRegion::from_corners(
                Coordinate::new(start_row, start_col),
                Coordinate::new(end_row, end_col),
            );
            match region.and_then(|r| map.insert(r)) {
                Ok(()) => {}
                Err(e) => tracing::warn!(error = %e, "skipping merge range"),
            }
        }
        map
    }

    /// Build from A1-style ranges such as `"A1:B2"`.
    pub fn from_a1<S: AsRef<str>>(ranges: &[S]) -> Self {
        let mut map = Self::new();
        for range in ranges {
            let range = range.as_ref();
            let region = parse_cell_range(range)
                .ok_or_else(|| GridError::InvalidRange(range.to_string()))
                .and_then(|(start, end)| MergeRegion::from_corners(start, end));
            match region.and_then(|r| map.insert(r)) {
                Ok(()) => {}
                Err(e) => tracing::warn!(error = %e, range, "skipping merge range"),
            }
        }
        map
    }

    /// Add a region. Fails on empty or oversized regions and on overlaps.
    pub fn insert(&mut self, region: MergeRegion) -> Result<()> {
        if region.row_span < 1 || region.col_span < 1 || region.cell_count() > MAX_REGION_CELLS {
            return Err(GridError::InvalidRange(format!(
                "{} spanning {}x{}",
                region.anchor, region.row_span, region.col_span
            )));
        }
        if self.regions.iter().any(|r| r.overlaps(&region)) {
            return Err(GridError::InvalidRange(format!(
                "{}..{} overlaps an existing merge",
                region.anchor,
                region.last()
            )));
        }
        let idx = self.regions.len();
        self.members.extend(region.spanning().map(|c| (c, idx)));
        self.regions.push(region);
        Ok(())
    }

    pub fn regions(&self) -> &[MergeRegion] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl MergeConfig for MergeMap {
    fn membership(&self, coord: Coordinate) -> Membership {
        match self.members.get(&coord) {
            Some(&idx) => Membership::Member {
                anchor: self.regions.get(idx).map(|r| r.anchor),
            },
            None => Membership::Unmerged,
        }
    }

    fn region_at(&self, coord: Coordinate) -> Option<MergeRegion> {
        let idx = self.members.get(&coord)?;
        self.regions.get(*idx).copied()
    }
}

/// Resolves coordinates to merge anchors over a configuration snapshot.
#[derive(Clone)]
pub struct MergeResolver {
    config: Rc<dyn MergeConfig>,
}

impl MergeResolver {
    pub fn new(config: Rc<dyn MergeConfig>) -> Self {
        Self { config }
    }

    /// Anchor of the region containing `coord`, or `coord` itself.
    ///
    /// Inconsistent configurations are logged and resolve to `coord`.
    pub fn resolve_anchor(&self, coord: Coordinate) -> Coordinate {
        match self.try_resolve_anchor(coord) {
            Ok(anchor) => anchor,
            Err(e) => {
                tracing::warn!(error = %e, "merge anchor lookup failed, using raw coordinate");
                coord
            }
        }
    }

    /// Like [`resolve_anchor`](Self::resolve_anchor) but reports inconsistencies.
    ///
    /// An anchor that does not resolve to itself counts as inconsistent, so
    /// a successful result is always a fixed point.
    pub fn try_resolve_anchor(&self, coord: Coordinate) -> Result<Coordinate> {
        let anchor = match self.config.membership(coord) {
            Membership::Unmerged => return Ok(coord),
            Membership::Member { anchor: None } => {
                return Err(GridError::MergeInconsistent(coord));
            }
            Membership::Member {
                anchor: Some(anchor),
            } => anchor,
        };
        if anchor == coord {
            return Ok(anchor);
        }
        match self.config.membership(anchor) {
            Membership::Member { anchor: Some(a) } if a == anchor => Ok(anchor),
            _ => Err(GridError::MergeInconsistent(coord)),
        }
    }

    pub fn region_at(&self, coord: Coordinate) -> Option<MergeRegion> {
        self.config.region_at(coord)
    }

    /// True if both resolvers share the same configuration snapshot.
    pub fn same_config(&self, other: &MergeResolver) -> bool {
        Rc::ptr_eq(&self.config, &other.config)
    }
}

impl Default for MergeResolver {
    fn default() -> Self {
        Self::new(Rc::new(NoMerges))
    }
}
