//! Built-in editors: text, numeric, and calendar.

use chrono::NaiveDate;

use super::{CellEditor, EditorContext};
use crate::types::CellValue;

/// Date format the calendar editor reads and writes.
pub const CALENDAR_FORMAT: &str = "%Y-%m-%d";

/// Plain text input, truncated to the column's `max_length` characters.
#[derive(Debug, Clone, Default)]
pub struct TextEditor {
    buffer: String,
    max_length: Option<usize>,
}

impl TextEditor {
    pub fn new(ctx: &EditorContext) -> Self {
        let mut editor = Self {
            buffer: String::new(),
            max_length: ctx.max_length,
        };
        editor.set_input(&ctx.initial_input);
        editor
    }
}

impl CellEditor for TextEditor {
    fn value(&self) -> Option<CellValue> {
        Some(CellValue::String(self.buffer.clone()))
    }

    fn set_input(&mut self, input: &str) {
        self.buffer = match self.max_length {
            Some(max) => input.chars().take(max).collect(),
            None => input.to_string(),
        };
    }

    fn display(&self) -> String {
        self.buffer.clone()
    }
}

/// Numeric input. Commits JSON numbers; empty input clears the cell.
#[derive(Debug, Clone, Default)]
pub struct NumericEditor {
    buffer: String,
}

impl NumericEditor {
    pub fn new(ctx: &EditorContext) -> Self {
        Self {
            buffer: ctx.initial_input.clone(),
        }
    }
}

impl CellEditor for NumericEditor {
    fn value(&self) -> Option<CellValue> {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            return Some(CellValue::String(String::new()));
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(CellValue::from(n));
        }
        let n = trimmed.parse::<f64>().ok()?;
        serde_json::Number::from_f64(n).map(CellValue::Number)
    }

    fn set_input(&mut self, input: &str) {
        self.buffer = input.to_string();
    }

    fn display(&self) -> String {
        self.buffer.clone()
    }
}

/// Date input shown in a popup; commits `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default)]
pub struct CalendarEditor {
    buffer: String,
}

impl CalendarEditor {
    pub fn new(ctx: &EditorContext) -> Self {
        Self {
            buffer: ctx.initial_input.clone(),
        }
    }

    /// Parsed date, if the buffer holds one.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.buffer.trim(), CALENDAR_FORMAT).ok()
    }
}

impl CellEditor for CalendarEditor {
    fn value(&self) -> Option<CellValue> {
        if self.buffer.trim().is_empty() {
            return Some(CellValue::String(String::new()));
        }
        let date = self.date()?;
        Some(CellValue::String(date.format(CALENDAR_FORMAT).to_string()))
    }

    fn set_input(&mut self, input: &str) {
        self.buffer = input.to_string();
    }

    fn display(&self) -> String {
        self.buffer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinate;
    use serde_json::json;
    use test_case::test_case;

    fn ctx(initial: &str, max_length: Option<usize>) -> EditorContext {
        EditorContext {
            coords: Coordinate::new(0, 0),
            initial_input: initial.to_string(),
            max_length,
        }
    }

    #[test]
    fn test_text_editor_truncates_to_max_length() {
        let mut editor = TextEditor::new(&ctx("abcdef", Some(3)));
        assert_eq!(editor.value(), Some(json!("abc")));
        editor.set_input("héllo");
        assert_eq!(editor.display(), "hél");
    }

    #[test_case("42", Some(json!(42)) ; "integer")]
    #[test_case(" 2.5 ", Some(json!(2.5)) ; "float")]
    #[test_case("", Some(json!("")) ; "empty clears")]
    #[test_case("abc", None ; "garbage cancels")]
    #[test_case("NaN", None ; "nan cancels")]
    fn test_numeric_editor_value(input: &str, expected: Option<CellValue>) {
        let editor = NumericEditor::new(&ctx(input, None));
        assert_eq!(editor.value(), expected);
    }

    #[test_case("2024-02-29", Some(json!("2024-02-29")) ; "leap day")]
    #[test_case(" 2024-1-5 ", Some(json!("2024-01-05")) ; "normalized")]
    #[test_case("2023-02-29", None ; "invalid day")]
    #[test_case("", Some(json!("")) ; "empty clears")]
    fn test_calendar_editor_value(input: &str, expected: Option<CellValue>) {
        let editor = CalendarEditor::new(&ctx(input, None));
        assert_eq!(editor.value(), expected);
    }
}
