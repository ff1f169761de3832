//! Utilities for parsing A1-style cell references and ranges into coordinates.

use crate::types::Coordinate;

/// Parse a cell reference like "B3" into a 0-indexed coordinate.
///
/// `$` markers are ignored. Returns `None` if either the column letters or
/// the row digits are missing, or the row is `0`.
pub fn parse_cell_ref(cell_ref: &str) -> Option<Coordinate> {
    let mut col: i64 = 0;
    let mut row: i64 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for b in cell_ref.trim().bytes() {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = b.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(i64::from(upper - b'A') + 1)?;
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some(Coordinate::new(
        i32::try_from(row - 1).ok()?,
        i32::try_from(col - 1).ok()?,
    ))
}

/// Parse a range like "A1:B10" (or a single "A1") into its top-left and
/// bottom-right corners, normalized so the first is never below or right
/// of the second.
pub fn parse_cell_range(range: &str) -> Option<(Coordinate, Coordinate)> {
    let (start, end) = match range.split_once(':') {
        Some((start, end)) => (parse_cell_ref(start)?, parse_cell_ref(end)?),
        None => {
            let cell = parse_cell_ref(range)?;
            (cell, cell)
        }
    };
    Some((
        Coordinate::new(
            start.row_index.min(end.row_index),
            start.col_index.min(end.col_index),
        ),
        Coordinate::new(
            start.row_index.max(end.row_index),
            start.col_index.max(end.col_index),
        ),
    ))
}

/// Column letters for a 0-indexed column ("A", "Z", "AA", ...).
pub fn col_to_letter(col: u32) -> String {
    let mut result = Vec::new();
    let mut n = col;
    loop {
        let rem = u8::try_from(n % 26).unwrap_or(0);
        result.push(b'A' + rem);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

/// A1-style label for a coordinate, or `None` for [`Coordinate::NONE`].
pub fn to_a1(coord: Coordinate) -> Option<String> {
    let row = u32::try_from(coord.row_index).ok()?;
    let col = u32::try_from(coord.col_index).ok()?;
    Some(format!("{}{}", col_to_letter(col), row + 1))
}
