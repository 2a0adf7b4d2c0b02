//! Polars `AnyValue` and `Column` helpers used while normalizing dictionaries.

use polars::prelude::{AnyValue, Column, DataType};

/// Renders a cell as text. Nulls become empty strings and whole floats lose
/// their fraction, so a variable read as `1.0` still renders as `1`.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Cell text, only for string cells.
///
/// Nulls and non-string values yield `None`; this is how a missing response
/// cell is told apart from a present one.
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        _ => None,
    }
}

/// Whole numbers print without a decimal point; everything else uses the
/// shortest round-tripping form.
pub fn format_numeric(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// True for string-typed columns.
pub fn is_text_column(column: &Column) -> bool {
    matches!(column.dtype(), DataType::String)
}

/// Mean character length of a column's cells; nulls count as zero.
pub fn mean_text_len(column: &Column) -> f64 {
    let height = column.len();
    if height == 0 {
        return 0.0;
    }
    let total: usize = (0..height)
        .map(|idx| {
            column
                .get(idx)
                .ok()
                .and_then(any_to_text)
                .map_or(0, |text| text.chars().count())
        })
        .sum();
    total as f64 / height as f64
}
