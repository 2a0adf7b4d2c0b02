//! ARC schema preparation.
//!
//! The ARC schema is published as a CSV with `Variable`, `Question`,
//! `Definition`, `Type` and `Answer Options` columns plus one `preset_<name>`
//! flag column per preset. This module turns that layout into a normalized
//! dictionary; fetching the file is left to the caller.

use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::info;

use arcmap_model::{ArcmapError, DataType, DictionaryField, ResponseParser};

use crate::dictionary::{NormalizeOptions, normalize_dictionary};
use crate::error::Result;
use crate::polars_utils::any_to_string;

pub const ARC_VARIABLE_COLUMN: &str = "Variable";
pub const ARC_QUESTION_COLUMN: &str = "Question";
pub const ARC_DEFINITION_COLUMN: &str = "Definition";
pub const ARC_TYPE_COLUMN: &str = "Type";
pub const ARC_RESPONSE_COLUMN: &str = "Answer Options";

const DESCRIPTION_COLUMN: &str = "Description";

/// Download location of a published ARC version.
pub fn arc_schema_url(arc_version: &str) -> String {
    format!(
        "https://github.com/ISARICResearch/DataPlatform/raw/refs/heads/main/ARCH/ARCH{arc_version}/ARCH.csv"
    )
}

/// Maps an ARC field type onto the coarse dictionary type.
pub fn arc_data_type(raw: &str) -> DataType {
    match raw.trim() {
        "radio" | "checkbox" | "dropdown" => DataType::Categorical,
        "number" => DataType::Number,
        "date_dmy" | "datetime_dmy" => DataType::Date,
        _ => DataType::String,
    }
}

/// Normalizes an ARC schema table, optionally restricted to one preset.
///
/// Descriptions join `Question` and `Definition`; answer options are read as
/// REDCap choice lists.
///
/// # Errors
///
/// [`ArcmapError::Schema`] when a required column is missing and
/// [`ArcmapError::Configuration`] when the preset column does not exist.
pub fn prepare_arc_schema(arc: &DataFrame, preset: Option<&str>) -> Result<Vec<DictionaryField>> {
    let question = arc_column(arc, ARC_QUESTION_COLUMN)?;
    let definition = arc_column(arc, ARC_DEFINITION_COLUMN)?;
    let types = arc_column(arc, ARC_TYPE_COLUMN)?;

    let height = arc.height();
    let descriptions: Vec<String> = (0..height)
        .map(|idx| join_description(&text_at(question, idx), &text_at(definition, idx)))
        .collect();
    let mapped_types: Vec<String> = (0..height)
        .map(|idx| arc_data_type(&text_at(types, idx)).to_string())
        .collect();

    let prepared = DataFrame::new(vec![
        arc_column(arc, ARC_VARIABLE_COLUMN)?.clone(),
        Series::new(DESCRIPTION_COLUMN.into(), descriptions).into_column(),
        Series::new(ARC_TYPE_COLUMN.into(), mapped_types).into_column(),
        arc_column(arc, ARC_RESPONSE_COLUMN)?.clone(),
    ])?;

    let options = NormalizeOptions::default()
        .with_variable_field(ARC_VARIABLE_COLUMN)
        .with_description_field(DESCRIPTION_COLUMN)
        .with_type_field(ARC_TYPE_COLUMN)
        .with_responses(ARC_RESPONSE_COLUMN, ResponseParser::Redcap);
    let mut fields = normalize_dictionary(&prepared, &options)?;

    if let Some(preset) = preset {
        let preset_name = format!("preset_{preset}");
        let flags = arc.column(&preset_name).map_err(|_| {
            ArcmapError::configuration(format!(
                "no such preset column exists in ARC: {preset_name}"
            ))
        })?;
        let mut idx = 0usize;
        fields.retain(|_| {
            let keep = is_flag_set(flags.get(idx).unwrap_or(AnyValue::Null));
            idx += 1;
            keep
        });
        info!(preset = %preset, fields = fields.len(), "applied ARC preset");
    }
    Ok(fields)
}

fn arc_column<'a>(arc: &'a DataFrame, name: &str) -> Result<&'a Column> {
    arc.column(name).map_err(|_| {
        ArcmapError::schema(format!("required ARC column not found: {name}")).into()
    })
}

fn text_at(column: &Column, idx: usize) -> String {
    any_to_string(column.get(idx).unwrap_or(AnyValue::Null))
}

fn join_description(question: &str, definition: &str) -> String {
    let question = question.trim();
    let definition = definition.trim();
    match (question.is_empty(), definition.is_empty()) {
        (false, false) => format!("{question} {definition}"),
        (false, true) => question.to_string(),
        (true, false) => definition.to_string(),
        (true, true) => String::new(),
    }
}

fn is_flag_set(value: AnyValue<'_>) -> bool {
    matches!(
        any_to_string(value).trim().to_ascii_lowercase().as_str(),
        "1" | "true"
    )
}
