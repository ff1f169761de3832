//! Data types shared by the coordinator and its collaborators.

mod column;
mod coord;
mod event;

pub use column::*;
pub use coord::*;
pub use event::*;

/// A cell value as stored in host rows.
pub type CellValue = serde_json::Value;

/// An opaque host record keyed by column accessor.
///
/// A missing key is an undefined cell; `null` is defined but empty.
pub type Row = serde_json::Map<String, CellValue>;

/// Text form of a cell value as an editor would show it.
///
/// Strings are verbatim, `null` is empty, everything else uses its
/// JSON text.
pub fn display_value(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!(5)), "5");
        assert_eq!(display_value(&json!(2.5)), "2.5");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&CellValue::Null), "");
    }
}
