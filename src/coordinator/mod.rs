//! The command/query surface tying navigation, editing, and merges together.
//!
//! `Coordinator` owns:
//! - the focused cell ([`NavigationState`])
//! - the single edit-session slot ([`EditSessionManager`])
//! - the current row/column/merge snapshots
//! - a queue of completion notifications the host drains
//!
//! Commands never return errors. Configuration problems are logged and the
//! command becomes a no-op, so a bad column or a vanished row can never
//! break the grid.

mod keys;
mod schedule;

use std::rc::Rc;

use serde::Serialize;

pub use keys::KeyModifiers;
pub use schedule::{DeferredCommand, DeferredMove, ManualScheduler, Scheduler, TimerId};

use crate::config::GridConfig;
use crate::data::GridData;
use crate::editor::{BeginEditing, BeginOutcome, EditSession, EditSessionManager, StopOutcome};
use crate::merge::{MergeConfig, MergeResolver};
use crate::navigation::NavigationState;
use crate::types::{
    AnchorRect, CellValue, ColumnLookup, Coordinate, Delta, GridBounds, Notification, Row,
};

/// Serializable view of the live session for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorStateSnapshot {
    pub coords: Coordinate,
    pub initial_value: CellValue,
    pub editor_kind: &'static str,
    pub is_modal: bool,
    /// Current editor text.
    pub display: String,
    pub anchor: Option<AnchorRect>,
}

impl EditorStateSnapshot {
    fn of(session: &EditSession) -> Self {
        Self {
            coords: session.coords(),
            initial_value: session.initial_value().clone(),
            editor_kind: session.kind().name(),
            is_modal: session.is_modal(),
            display: session.editor().display(),
            anchor: session.anchor(),
        }
    }
}

pub struct Coordinator {
    config: GridConfig,
    data: GridData,
    merges: MergeResolver,
    navigation: NavigationState,
    editing: EditSessionManager,
    outbox: Vec<Notification>,
    scheduler: Box<dyn Scheduler>,
    pending: Option<DeferredMove>,
    next_timer: TimerId,
}

impl Coordinator {
    pub fn new(config: GridConfig, data: GridData, scheduler: Box<dyn Scheduler>) -> Self {
        Self {
            config,
            data,
            merges: MergeResolver::default(),
            navigation: NavigationState::new(),
            editing: EditSessionManager::new(),
            outbox: Vec::new(),
            scheduler,
            pending: None,
            next_timer: 1,
        }
    }

    /// Coordinator with default config, no data, and a [`ManualScheduler`].
    pub fn with_data(rows: Vec<Row>, columns: Rc<dyn ColumnLookup>) -> Self {
        Self::new(
            GridConfig::default(),
            GridData::new(Rc::new(rows), columns),
            Box::new(ManualScheduler::new()),
        )
    }

    #[must_use]
    pub fn with_merges(mut self, merges: Rc<dyn MergeConfig>) -> Self {
        self.merges = MergeResolver::new(merges);
        self
    }

    /// Start focused on `initial` (resolved through merges, ignored if out of bounds).
    #[must_use]
    pub fn with_initial_focus(mut self, initial: Coordinate) -> Self {
        if let Some(bounds) = self.data.bounds() {
            self.navigation.move_to(initial, bounds, &self.merges);
        }
        self
    }

    // ---- Commands ----

    /// Focus `target` within the current data bounds.
    pub fn move_to(&mut self, target: Coordinate) -> Option<Coordinate> {
        let bounds = self.data_bounds()?;
        self.move_to_within(target, bounds)
    }

    /// Focus `target`, rejecting it if outside `bounds`.
    pub fn move_to_within(&mut self, target: Coordinate, bounds: GridBounds) -> Option<Coordinate> {
        let moved = self.navigation.move_to(target, bounds, &self.merges)?;
        self.after_move(moved, true);
        Some(moved)
    }

    /// Move focus by `delta` within the current data bounds.
    pub fn move_by(&mut self, delta: Delta) -> Option<Coordinate> {
        let bounds = self.data_bounds()?;
        self.move_by_within(delta, bounds)
    }

    pub fn move_by_within(&mut self, delta: Delta, bounds: GridBounds) -> Option<Coordinate> {
        let moved = self.navigation.move_by(delta, bounds, &self.merges)?;
        self.after_move(moved, true);
        Some(moved)
    }

    /// Open an editor at `coords` (resolved to its merge anchor).
    ///
    /// Returns true if a new session started. Rejections are silent for
    /// read-only and selection columns, and logged for missing rows,
    /// missing columns, and editors that fail to build.
    pub fn begin_editing(
        &mut self,
        coords: Coordinate,
        anchor: Option<AnchorRect>,
        default_key: Option<&str>,
    ) -> bool {
        let coords = self.merges.resolve_anchor(coords);
        let request = BeginEditing {
            coords,
            anchor,
            default_key: default_key.map(str::to_string),
        };
        match self.editing.begin(
            request,
            &self.data,
            self.config.commit_on_move,
            &mut self.outbox,
        ) {
            Ok(BeginOutcome::Started) => {
                // A move queued by the previous close must not land on this session.
                self.cancel_pending();
                if let Some(bounds) = self.data.bounds() {
                    self.navigation.move_to(coords, bounds, &self.merges);
                }
                true
            }
            Ok(outcome) => {
                tracing::debug!(%coords, ?outcome, "begin editing ignored");
                false
            }
            Err(e) => {
                tracing::error!(%coords, error = %e, "begin editing rejected");
                false
            }
        }
    }

    /// Close the live session, committing when `save` is true.
    ///
    /// Returns `None` if nothing was being edited.
    pub fn stop_editing(&mut self, save: bool) -> Option<StopOutcome> {
        self.editing.stop(save, &mut self.outbox)
    }

    /// Forward the user's typing into the live editor.
    pub fn update_editor_input(&mut self, input: &str) -> bool {
        self.editing.update_input(input)
    }

    // ---- Data changes ----

    /// Replace the row snapshot; a new identity triggers reconciliation.
    pub fn set_rows(&mut self, rows: Rc<Vec<Row>>) {
        if self.data.set_rows(rows) {
            self.reconcile();
        }
    }

    /// Replace the column lookup; a new identity triggers reconciliation.
    pub fn set_columns(&mut self, columns: Rc<dyn ColumnLookup>) {
        if self.data.set_columns(columns) {
            self.reconcile();
        }
    }

    /// Replace the merge configuration snapshot.
    pub fn set_merges(&mut self, merges: Rc<dyn MergeConfig>) {
        let next = MergeResolver::new(merges);
        if next.same_config(&self.merges) {
            return;
        }
        self.merges = next;
        self.reconcile();
    }

    /// Close a session whose cell vanished, and pull focus back into the grid.
    fn reconcile(&mut self) {
        if let Some(coords) = self.editing.session().map(EditSession::coords) {
            let cell_defined = self.data.value_at(coords).is_some();
            let still_anchor = self.merges.resolve_anchor(coords) == coords;
            if !cell_defined || !still_anchor {
                tracing::debug!(%coords, cell_defined, still_anchor, "edit session invalidated by data change");
                self.editing.stop(false, &mut self.outbox);
            }
        }
        self.navigation.reconcile(self.data.bounds(), &self.merges);
    }

    // ---- Deferred commands ----

    /// Queue `command` to run after the configured delay, superseding any
    /// command still waiting.
    fn schedule(&mut self, command: DeferredCommand) {
        self.cancel_pending();
        let id = self.next_timer;
        self.next_timer = self.next_timer.wrapping_add(1);
        self.scheduler.schedule(id, self.config.deferred_move_delay_ms);
        self.pending = Some(DeferredMove { id, command });
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(pending.id);
        }
    }

    /// Timer callback. Stale or cancelled ids are ignored.
    pub fn run_deferred(&mut self, id: TimerId) -> bool {
        self.scheduler.fired(id);
        match self.pending {
            Some(pending) if pending.id == id => {
                self.pending = None;
                match pending.command {
                    DeferredCommand::MoveBy(delta) => {
                        if let Some(bounds) = self.data_bounds() {
                            if let Some(moved) =
                                self.navigation.move_by(delta, bounds, &self.merges)
                            {
                                self.after_move(moved, false);
                            }
                        }
                    }
                }
                true
            }
            _ => {
                tracing::debug!(id, "ignoring stale deferred command");
                false
            }
        }
    }

    pub fn pending_deferred(&self) -> Option<DeferredMove> {
        self.pending
    }

    /// Cancel any pending deferred command and discard the live session.
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.editing.stop(false, &mut self.outbox);
    }

    // ---- Queries ----

    pub fn focused(&self) -> Coordinate {
        self.navigation.current()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_editing()
    }

    pub fn editor_state(&self) -> Option<&EditSession> {
        self.editing.session()
    }

    pub fn editor_snapshot(&self) -> Option<EditorStateSnapshot> {
        self.editing.session().map(EditorStateSnapshot::of)
    }

    /// Text the rendering layer shows in the open editor.
    pub fn editor_display(&self) -> Option<String> {
        self.editing.session().map(|s| s.editor().display())
    }

    pub fn bounds(&self) -> Option<GridBounds> {
        self.data.bounds()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn data(&self) -> &GridData {
        &self.data
    }

    pub fn resolve_anchor(&self, coord: Coordinate) -> Coordinate {
        self.merges.resolve_anchor(coord)
    }

    /// Drain queued notifications in emission order.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    // ---- Internals ----

    fn data_bounds(&self) -> Option<GridBounds> {
        let bounds = self.data.bounds();
        if bounds.is_none() {
            tracing::debug!("move ignored: grid is empty");
        }
        bounds
    }

    /// Shared tail of every accepted move.
    fn after_move(&mut self, moved: Coordinate, direct: bool) {
        if direct {
            self.cancel_pending();
        }
        if self.editing.is_editing() && !self.editing.editing_at(moved) {
            self.editing.stop(self.config.commit_on_move, &mut self.outbox);
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
