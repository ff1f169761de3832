//! CLI tool for gridedit - replays a scenario file and prints notifications
//!
//! Usage:
//!   gridedit_cli <scenario.json>              # Output JSON to stdout
//!   gridedit_cli <scenario.json> -o out.json  # Output JSON to file
//!
//! A scenario looks like:
//!
//! ```json
//! {
//!   "config": { "commitOnMove": false },
//!   "columns": [{ "id": "name" }, { "id": "qty", "type": "numeric" }],
//!   "rows": [{ "name": "a", "qty": 1 }],
//!   "merges": ["A1:B1"],
//!   "commands": [
//!     { "op": "moveTo", "row": 0, "col": 1 },
//!     { "op": "beginEditing", "row": 0, "col": 1, "defaultKey": "9" },
//!     { "op": "input", "text": "9x" },
//!     { "op": "stopEditing", "save": true }
//!   ]
//! }
//! ```

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use gridedit::cell_ref::to_a1;
use gridedit::coordinator::{KeyModifiers, ManualScheduler};
use gridedit::data::GridData;
use gridedit::merge::MergeMap;
use gridedit::{
    ColumnDescriptor, ColumnSpec, Coordinate, Coordinator, Delta, GridConfig, Notification, Row,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Scenario {
    #[serde(default)]
    config: GridConfig,
    columns: Vec<ColumnSpec>,
    rows: Vec<Row>,
    #[serde(default)]
    merges: Vec<String>,
    commands: Vec<Command>,
}

#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum Command {
    MoveTo {
        row: i32,
        col: i32,
    },
    MoveBy {
        rows: i32,
        cols: i32,
    },
    #[serde(rename_all = "camelCase")]
    BeginEditing {
        row: i32,
        col: i32,
        default_key: Option<String>,
    },
    Input {
        text: String,
    },
    StopEditing {
        #[serde(default = "default_save")]
        save: bool,
    },
    Key {
        key: String,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        ctrl: bool,
    },
    /// Fire every pending deferred command.
    Tick,
    SetRows {
        rows: Vec<Row>,
    },
}

fn default_save() -> bool {
    true
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Step {
    index: usize,
    focused: Coordinate,
    /// A1 label of the focused cell, `null` when nothing is focused.
    focused_cell: Option<String>,
    editing: bool,
    notifications: Vec<Notification>,
}

fn run(scenario: Scenario) -> Vec<Step> {
    let scheduler = ManualScheduler::new();
    let columns: Vec<ColumnDescriptor> = scenario
        .columns
        .into_iter()
        .map(ColumnSpec::into_descriptor)
        .collect();
    let data = GridData::new(Rc::new(scenario.rows), Rc::new(columns));
    let mut grid = Coordinator::new(scenario.config, data, Box::new(scheduler.clone()))
        .with_merges(Rc::new(MergeMap::from_a1(&scenario.merges)));

    let mut steps = Vec::with_capacity(scenario.commands.len());
    for (index, command) in scenario.commands.into_iter().enumerate() {
        match command {
            Command::MoveTo { row, col } => {
                grid.move_to(Coordinate::new(row, col));
            }
            Command::MoveBy { rows, cols } => {
                grid.move_by(Delta::new(rows, cols));
            }
            Command::BeginEditing {
                row,
                col,
                default_key,
            } => {
                grid.begin_editing(Coordinate::new(row, col), None, default_key.as_deref());
            }
            Command::Input { text } => {
                grid.update_editor_input(&text);
            }
            Command::StopEditing { save } => {
                grid.stop_editing(save);
            }
            Command::Key { key, shift, ctrl } => {
                grid.handle_key(
                    &key,
                    KeyModifiers {
                        shift,
                        ctrl,
                        alt: false,
                    },
                );
            }
            Command::Tick => {
                for id in scheduler.take_due() {
                    grid.run_deferred(id);
                }
            }
            Command::SetRows { rows } => grid.set_rows(Rc::new(rows)),
        }
        steps.push(Step {
            index,
            focused: grid.focused(),
            focused_cell: to_a1(grid.focused()),
            editing: grid.is_editing(),
            notifications: grid.take_notifications(),
        });
    }
    steps
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: gridedit_cli <scenario.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    let scenario: Scenario = match fs::read_to_string(input_path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading scenario {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = scenario.config.validate() {
        eprintln!("Invalid config in {}: {}", input_path, e);
        std::process::exit(1);
    }
    gridedit::logging::init(&scenario.config.log_filter);

    let steps = run(scenario);

    let json = match serde_json::to_string_pretty(&steps) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
