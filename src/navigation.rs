//! Focused-cell tracking.
//!
//! Holds the single focused coordinate. Moves outside the grid are
//! rejected rather than clamped, and every accepted target is redirected
//! to its merge anchor.

use crate::merge::MergeResolver;
use crate::types::{Coordinate, Delta, GridBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    current: Coordinate,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start focused on `initial` (e.g. a host-supplied default cell).
    pub fn with_initial(initial: Coordinate) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Coordinate {
        self.current
    }

    /// Move focus to `target`.
    ///
    /// Returns the new (anchor-resolved) focus, or `None` if `target` is
    /// outside `bounds` and the state was left unchanged.
    pub fn move_to(
        &mut self,
        target: Coordinate,
        bounds: GridBounds,
        merges: &MergeResolver,
    ) -> Option<Coordinate> {
        if !bounds.contains(target) {
            tracing::debug!(%target, ?bounds, "move rejected: out of bounds");
            return None;
        }
        self.current = merges.resolve_anchor(target);
        Some(self.current)
    }

    /// Move focus relative to the current cell.
    ///
    /// Leaving a merged region steps from its far edge in the direction of
    /// travel, so the region is crossed in a single move. With nothing
    /// focused, any move lands on `(0, 0)`.
    pub fn move_by(
        &mut self,
        delta: Delta,
        bounds: GridBounds,
        merges: &MergeResolver,
    ) -> Option<Coordinate> {
        let target = self.target_for(delta, merges);
        self.move_to(target, bounds, merges)
    }

    /// Where `move_by(delta)` would aim before bounds and merge resolution.
    pub fn target_for(&self, delta: Delta, merges: &MergeResolver) -> Coordinate {
        if self.current.is_none() {
            return Coordinate::new(0, 0);
        }
        let origin = match merges.region_at(self.current) {
            Some(region) => {
                let last = region.last();
                Coordinate::new(
                    if delta.rows > 0 {
                        last.row_index
                    } else {
                        region.anchor.row_index
                    },
                    if delta.cols > 0 {
                        last.col_index
                    } else {
                        region.anchor.col_index
                    },
                )
            }
            None => self.current,
        };
        origin.offset(delta)
    }

    /// Pull focus back inside `bounds` after the grid shrank.
    ///
    /// With no bounds (empty grid) focus is cleared. Returns true if the
    /// focus changed.
    pub fn reconcile(&mut self, bounds: Option<GridBounds>, merges: &MergeResolver) -> bool {
        if self.current.is_none() {
            return false;
        }
        let next = match bounds {
            Some(bounds) if bounds.contains(self.current) => merges.resolve_anchor(self.current),
            Some(bounds) => merges.resolve_anchor(bounds.clamp(self.current)),
            None => Coordinate::NONE,
        };
        let changed = next != self.current;
        self.current = next;
        changed
    }
}
