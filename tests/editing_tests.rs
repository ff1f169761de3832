//! Tests for the edit-session lifecycle through the coordinator.
//!
//! Covers begin/stop, column gating (read-only, selection, custom
//! editors), validation, and the exact notification sequences a host
//! observes.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::rc::Rc;

use common::{at, begin, change, changes, row, stop, GridBuilder};
use gridedit::editor::{CellEditor, EditorContext, EditorFactory, StopOutcome};
use gridedit::error::{GridError, Result};
use gridedit::{CellValue, ColumnDescriptor, ColumnType, Notification};
use serde_json::json;

// ============================================================================
// Basic lifecycle
// ============================================================================

#[test]
fn test_typed_key_on_empty_cell_commits_change() {
    let (mut grid, _) = GridBuilder::empty_cells(5, 3).build();

    assert!(grid.begin_editing(at(2, 1), None, Some("9")));
    assert_eq!(grid.editor_display().as_deref(), Some("9"));
    assert!(grid.update_editor_input("9x"));

    let outcome = grid.stop_editing(true);
    assert!(matches!(outcome, Some(StopOutcome::Committed(_))));
    assert_eq!(
        grid.take_notifications(),
        vec![
            begin(at(2, 1)),
            change(at(2, 1), json!(""), json!("9x")),
            stop(at(2, 1)),
        ]
    );
    assert!(!grid.is_editing());
}

#[test]
fn test_default_key_is_appended_to_existing_value() {
    let (mut grid, _) = GridBuilder::filled(2, 2).build();
    grid.begin_editing(at(1, 0), None, Some("!"));
    assert_eq!(grid.editor_display().as_deref(), Some("r1c0!"));
}

#[test]
fn test_begin_at_same_coordinate_is_noop() {
    let (mut grid, _) = GridBuilder::filled(3, 3).build();
    assert!(grid.begin_editing(at(1, 1), None, None));
    grid.update_editor_input("typed");

    assert!(!grid.begin_editing(at(1, 1), None, Some("z")));
    assert_eq!(grid.editor_display().as_deref(), Some("typed"));
    assert_eq!(grid.take_notifications(), vec![begin(at(1, 1))]);
}

#[test]
fn test_unchanged_value_emits_no_change() {
    let (mut grid, _) = GridBuilder::filled(3, 3).build();
    grid.begin_editing(at(0, 0), None, None);

    assert_eq!(grid.stop_editing(true), Some(StopOutcome::Unchanged));
    assert_eq!(
        grid.take_notifications(),
        vec![begin(at(0, 0)), stop(at(0, 0))]
    );
}

#[test]
fn test_discard_emits_only_stop() {
    let (mut grid, _) = GridBuilder::filled(3, 3).build();
    grid.begin_editing(at(0, 0), None, None);
    grid.update_editor_input("thrown away");

    assert_eq!(grid.stop_editing(false), Some(StopOutcome::Discarded));
    assert!(changes(&grid.take_notifications()).is_empty());
}

#[test]
fn test_stop_when_idle_returns_none() {
    let (mut grid, _) = GridBuilder::filled(3, 3).build();
    assert_eq!(grid.stop_editing(true), None);
    assert!(grid.take_notifications().is_empty());
}

#[test]
fn test_null_value_starts_with_empty_buffer() {
    let (mut grid, _) = GridBuilder::filled(1, 1)
        .rows(vec![row(json!({"c0": null}))])
        .build();
    grid.begin_editing(at(0, 0), None, None);
    assert_eq!(grid.editor_display().as_deref(), Some(""));
    assert_eq!(grid.editor_snapshot().unwrap().initial_value, json!(""));
}

// ============================================================================
// Column gating
// ============================================================================

#[test]
fn test_read_only_column_rejects_begin() {
    let (mut grid, _) = GridBuilder::filled(3, 3)
        .column(2, ColumnDescriptor::new("c2", "c2").read_only(true))
        .build();

    assert!(!grid.begin_editing(at(0, 2), None, None));
    assert!(!grid.is_editing());
    assert!(grid.take_notifications().is_empty());
}

#[test]
fn test_read_only_predicate_is_per_cell() {
    let (mut grid, _) = GridBuilder::filled(3, 2)
        .column(
            1,
            ColumnDescriptor::new("c1", "c1").read_only_when(|c| c.row_index == 0),
        )
        .build();

    assert!(!grid.begin_editing(at(0, 1), None, None));
    assert!(grid.begin_editing(at(1, 1), None, None));
}

#[test]
fn test_selection_column_is_never_editable() {
    let (mut grid, _) = GridBuilder::filled(2, 2)
        .column(0, ColumnDescriptor::selection())
        .build();
    assert!(!grid.begin_editing(at(0, 0), None, Some("x")));
    assert!(grid.take_notifications().is_empty());
}

#[test]
fn test_missing_row_or_column_is_rejected() {
    let (mut grid, _) = GridBuilder::filled(2, 2).build();
    assert!(!grid.begin_editing(at(5, 0), None, None));
    assert!(!grid.begin_editing(at(0, 5), None, None));
    assert!(!grid.is_editing());
}

#[test]
fn test_rejected_begin_keeps_existing_session() {
    let (mut grid, _) = GridBuilder::filled(3, 3)
        .column(2, ColumnDescriptor::new("c2", "c2").read_only(true))
        .build();
    grid.begin_editing(at(0, 0), None, None);
    grid.take_notifications();

    assert!(!grid.begin_editing(at(0, 2), None, None));
    assert_eq!(grid.editor_state().map(|s| s.coords()), Some(at(0, 0)));
    assert!(grid.take_notifications().is_empty());
}

// ============================================================================
// Validation and typed editors
// ============================================================================

#[test]
fn test_failing_validator_returns_to_idle_without_change() {
    let (mut grid, _) = GridBuilder::filled(2, 2)
        .column(0, ColumnDescriptor::new("c0", "c0").with_validator(|_| false))
        .build();
    grid.begin_editing(at(0, 0), None, None);
    grid.update_editor_input("rejected");

    assert_eq!(grid.stop_editing(true), Some(StopOutcome::Invalid));
    assert!(!grid.is_editing());
    assert_eq!(
        grid.take_notifications(),
        vec![begin(at(0, 0)), stop(at(0, 0))]
    );
}

#[test]
fn test_validator_sees_candidate_value() {
    let (mut grid, _) = GridBuilder::filled(1, 1)
        .column(
            0,
            ColumnDescriptor::new("c0", "c0")
                .with_validator(|v| v.as_str().is_some_and(|s| s.len() <= 3)),
        )
        .build();

    grid.begin_editing(at(0, 0), None, None);
    grid.update_editor_input("abcd");
    assert_eq!(grid.stop_editing(true), Some(StopOutcome::Invalid));

    grid.begin_editing(at(0, 0), None, None);
    grid.update_editor_input("abc");
    assert!(matches!(
        grid.stop_editing(true),
        Some(StopOutcome::Committed(_))
    ));
}

#[test]
fn test_numeric_column_commits_numbers() {
    let (mut grid, _) = GridBuilder::filled(1, 2)
        .rows(vec![row(json!({"c0": "a", "c1": 5}))])
        .column(1, ColumnDescriptor::new("c1", "c1").with_type(ColumnType::Numeric))
        .build();

    grid.begin_editing(at(0, 1), None, None);
    assert_eq!(grid.editor_display().as_deref(), Some("5"));
    grid.update_editor_input("42");
    grid.stop_editing(true);

    assert_eq!(
        changes(&grid.take_notifications())[0].new_value,
        json!(42)
    );
}

#[test]
fn test_numeric_garbage_is_treated_as_cancel() {
    let (mut grid, _) = GridBuilder::filled(1, 1)
        .column(0, ColumnDescriptor::new("c0", "c0").with_type(ColumnType::Numeric))
        .build();
    grid.begin_editing(at(0, 0), None, None);
    grid.update_editor_input("twelve");

    assert_eq!(grid.stop_editing(true), Some(StopOutcome::NoValue));
    assert!(changes(&grid.take_notifications()).is_empty());
}

#[test]
fn test_calendar_editor_is_modal_and_normalizes() {
    let (mut grid, _) = GridBuilder::filled(1, 1)
        .rows(vec![row(json!({"c0": "2024-01-01"}))])
        .column(0, ColumnDescriptor::new("c0", "c0").with_type(ColumnType::Calendar))
        .build();
    grid.begin_editing(at(0, 0), None, None);

    let snapshot = grid.editor_snapshot().unwrap();
    assert!(snapshot.is_modal);
    assert_eq!(snapshot.editor_kind, "calendar");

    grid.update_editor_input(" 2024-02-05 ");
    grid.stop_editing(true);
    assert_eq!(
        changes(&grid.take_notifications())[0].new_value,
        json!("2024-02-05")
    );
}

#[test]
fn test_max_length_truncates_committed_text() {
    let (mut grid, _) = GridBuilder::empty_cells(1, 1)
        .column(0, ColumnDescriptor::new("c0", "c0").with_max_length(3))
        .build();
    grid.begin_editing(at(0, 0), None, None);
    grid.update_editor_input("abcdef");
    grid.stop_editing(true);
    assert_eq!(
        changes(&grid.take_notifications())[0].new_value,
        json!("abc")
    );
}

// ============================================================================
// Custom editors
// ============================================================================

struct Shouting(String);

impl CellEditor for Shouting {
    fn value(&self) -> Option<CellValue> {
        Some(CellValue::String(self.0.to_uppercase()))
    }

    fn set_input(&mut self, input: &str) {
        self.0 = input.to_string();
    }

    fn display(&self) -> String {
        self.0.clone()
    }
}

struct ShoutingFactory;

impl EditorFactory for ShoutingFactory {
    fn create(&self, ctx: &EditorContext) -> Result<Box<dyn CellEditor>> {
        Ok(Box::new(Shouting(ctx.initial_input.clone())))
    }
}

struct MalformedFactory;

impl EditorFactory for MalformedFactory {
    fn create(&self, ctx: &EditorContext) -> Result<Box<dyn CellEditor>> {
        Err(GridError::MalformedEditor {
            coords: ctx.coords,
            reason: "missing value accessor".into(),
        })
    }
}

#[test]
fn test_custom_factory_takes_precedence() {
    let (mut grid, _) = GridBuilder::filled(1, 1)
        .column(
            0,
            ColumnDescriptor::new("c0", "c0")
                .with_type(ColumnType::Numeric)
                .with_editor(Rc::new(ShoutingFactory)),
        )
        .build();
    grid.begin_editing(at(0, 0), None, None);
    assert_eq!(grid.editor_snapshot().unwrap().editor_kind, "custom");

    grid.update_editor_input("quiet");
    grid.stop_editing(true);
    assert_eq!(
        changes(&grid.take_notifications())[0].new_value,
        json!("QUIET")
    );
}

#[test]
fn test_malformed_custom_editor_is_rejected() {
    let (mut grid, _) = GridBuilder::filled(2, 1)
        .column(
            0,
            ColumnDescriptor::new("c0", "c0").with_editor(Rc::new(MalformedFactory)),
        )
        .build();

    assert!(!grid.begin_editing(at(0, 0), None, None));
    assert!(!grid.is_editing());
    assert!(grid.take_notifications().is_empty());
}

// ============================================================================
// Replacing sessions
// ============================================================================

#[test]
fn test_switching_cells_discards_by_default() {
    let (mut grid, _) = GridBuilder::filled(3, 2).build();
    grid.begin_editing(at(0, 0), None, None);
    grid.update_editor_input("unsaved");
    grid.begin_editing(at(1, 0), None, None);

    assert_eq!(
        grid.take_notifications(),
        vec![begin(at(0, 0)), stop(at(0, 0)), begin(at(1, 0))]
    );
    assert_eq!(grid.focused(), at(1, 0));
}

#[test]
fn test_switching_cells_commits_with_commit_on_move() {
    let (mut grid, _) = GridBuilder::filled(3, 2).commit_on_move().build();
    grid.begin_editing(at(0, 0), None, None);
    grid.update_editor_input("saved");
    grid.begin_editing(at(1, 0), None, None);

    let notes = grid.take_notifications();
    assert_eq!(notes.len(), 4);
    assert_eq!(notes[1], change(at(0, 0), json!("r0c0"), json!("saved")));
    assert_eq!(notes[2], stop(at(0, 0)));
    assert!(matches!(notes[3], Notification::BeginEditing { .. }));
}

#[test]
fn test_at_most_one_session() {
    let (mut grid, _) = GridBuilder::filled(4, 4).build();
    for r in 0..4 {
        for c in 0..4 {
            grid.begin_editing(at(r, c), None, None);
            assert_eq!(grid.editor_state().map(|s| s.coords()), Some(at(r, c)));
        }
    }
    let notes = grid.take_notifications();
    let begins = notes
        .iter()
        .filter(|n| matches!(n, Notification::BeginEditing { .. }))
        .count();
    let stops = notes
        .iter()
        .filter(|n| matches!(n, Notification::StopEditing { .. }))
        .count();
    assert_eq!(begins, stops + 1);
}
