//! Keyboard commands.
//!
//! Key names follow `KeyboardEvent.key` ("ArrowDown", "Enter", "a", ...).
//! Returns from [`Coordinator::handle_key`] tell the host whether to
//! `preventDefault()`.

use super::{Coordinator, DeferredCommand};
use crate::types::{Coordinate, Delta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    /// Ctrl or Cmd.
    pub ctrl: bool,
    pub alt: bool,
}

fn arrow_delta(key: &str) -> Option<Delta> {
    match key {
        "ArrowUp" => Some(Delta::UP),
        "ArrowDown" => Some(Delta::DOWN),
        "ArrowLeft" => Some(Delta::LEFT),
        "ArrowRight" => Some(Delta::RIGHT),
        _ => None,
    }
}

/// A single printable character that should start an edit.
fn printable(key: &str, mods: KeyModifiers) -> bool {
    if mods.ctrl || mods.alt {
        return false;
    }
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_control())
}

impl Coordinator {
    /// Apply a key press. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: &str, mods: KeyModifiers) -> bool {
        if self.is_editing() {
            self.handle_editing_key(key, mods)
        } else {
            self.handle_navigation_key(key, mods)
        }
    }

    fn handle_navigation_key(&mut self, key: &str, mods: KeyModifiers) -> bool {
        let focused = self.focused();
        if let Some(delta) = arrow_delta(key) {
            if mods.ctrl {
                return self.jump_to_edge(delta).is_some();
            }
            return self.move_by(delta).is_some();
        }
        match key {
            "Tab" => {
                let delta = if mods.shift { Delta::LEFT } else { Delta::RIGHT };
                self.move_by(delta).is_some()
            }
            "Home" | "End" => self.jump_home_end(key == "End", mods.ctrl).is_some(),
            "Enter" | "F2" if !focused.is_none() => self.begin_editing(focused, None, None),
            "Delete" | "Backspace" if !focused.is_none() => self.clear_cell(focused),
            _ if !focused.is_none() && printable(key, mods) => {
                self.begin_editing(focused, None, Some(key))
            }
            _ => false,
        }
    }

    fn handle_editing_key(&mut self, key: &str, mods: KeyModifiers) -> bool {
        let modal = self.editor_state().is_some_and(|s| s.is_modal());
        match key {
            "Escape" => self.stop_editing(false).is_some(),
            "Enter" => {
                self.stop_editing(true);
                if self.config.enter_moves_down {
                    let delta = if mods.shift { Delta::UP } else { Delta::DOWN };
                    self.schedule(DeferredCommand::MoveBy(delta));
                }
                true
            }
            "Tab" => {
                self.stop_editing(true);
                let delta = if mods.shift { Delta::LEFT } else { Delta::RIGHT };
                self.schedule(DeferredCommand::MoveBy(delta));
                true
            }
            // Left/Right stay with the text caret; popups keep every arrow.
            "ArrowUp" | "ArrowDown" if !modal => {
                self.stop_editing(true);
                if let Some(delta) = arrow_delta(key) {
                    self.schedule(DeferredCommand::MoveBy(delta));
                }
                true
            }
            _ => false,
        }
    }

    /// Delete: commit an empty value through a normal edit cycle, so
    /// read-only columns and validators still apply.
    fn clear_cell(&mut self, coords: Coordinate) -> bool {
        if !self.begin_editing(coords, None, None) {
            return false;
        }
        self.update_editor_input("");
        self.stop_editing(true);
        true
    }

    /// Ctrl+Arrow: first or last row/column in the direction of travel.
    fn jump_to_edge(&mut self, delta: Delta) -> Option<Coordinate> {
        let bounds = self.bounds()?;
        let focused = self.focused();
        let from = if focused.is_none() {
            Coordinate::new(0, 0)
        } else {
            focused
        };
        let target = Coordinate::new(
            match delta.rows.signum() {
                1 => bounds.max_row,
                -1 => 0,
                _ => from.row_index,
            },
            match delta.cols.signum() {
                1 => bounds.max_col,
                -1 => 0,
                _ => from.col_index,
            },
        );
        self.move_to(target)
    }

    /// Home/End: row start/end, or the grid corners with Ctrl.
    fn jump_home_end(&mut self, end: bool, whole_grid: bool) -> Option<Coordinate> {
        let bounds = self.bounds()?;
        let row = self.focused().row_index.max(0);
        let target = match (end, whole_grid) {
            (false, false) => Coordinate::new(row, 0),
            (true, false) => Coordinate::new(row, bounds.max_col),
            (false, true) => Coordinate::new(0, 0),
            (true, true) => Coordinate::new(bounds.max_row, bounds.max_col),
        };
        self.move_to(target)
    }
}
