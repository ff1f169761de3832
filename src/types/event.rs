use serde::{Deserialize, Serialize};

use super::{CellValue, Coordinate};

/// A committed edit, emitted once per commit whose value actually changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellChangeEvent {
    pub coords: Coordinate,
    pub previous_value: CellValue,
    pub new_value: CellValue,
}

/// Completion notifications, queued in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notification {
    BeginEditing { coords: Coordinate },
    StopEditing { coords: Coordinate },
    CellChange(CellChangeEvent),
}
