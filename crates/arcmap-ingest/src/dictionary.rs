//! Dictionary normalizer: raw tabular data dictionary to [`DictionaryField`]s.
//!
//! Response lists are only read when both a response column and a parser
//! are configured, since there is no standard encoding for them.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::{debug, info};

use arcmap_model::{ArcmapError, DataType, DictionaryField, ResponseParser, Result};

use crate::polars_utils::{any_to_string, any_to_text, is_text_column, mean_text_len};

/// Column selection for [`normalize_dictionary`].
///
/// Every field is optional:
/// - `variable_field` defaults to the first column
/// - `description_field` defaults to the string column with the longest
///   mean cell length
/// - `type_field` absent means every field is a `string`
/// - `response_field` and `response_parser` must be given together
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub variable_field: Option<String>,
    pub description_field: Option<String>,
    pub type_field: Option<String>,
    pub response_field: Option<String>,
    pub response_parser: Option<ResponseParser>,
}

impl NormalizeOptions {
    #[must_use]
    pub fn with_variable_field(mut self, field: impl Into<String>) -> Self {
        self.variable_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_description_field(mut self, field: impl Into<String>) -> Self {
        self.description_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_type_field(mut self, field: impl Into<String>) -> Self {
        self.type_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_responses(mut self, field: impl Into<String>, parser: ResponseParser) -> Self {
        self.response_field = Some(field.into());
        self.response_parser = Some(parser);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.response_field.is_some() != self.response_parser.is_some() {
            return Err(ArcmapError::configuration(
                "both response_field and response_parser have to be specified",
            ));
        }
        Ok(())
    }
}

/// Converts a raw data dictionary into normalized fields, preserving row order.
///
/// # Errors
///
/// - [`ArcmapError::Configuration`] when only one of the response options is set
/// - [`ArcmapError::Schema`] when a named column is missing, no description
///   column can be inferred, or variable names are empty or repeated
pub fn normalize_dictionary(
    source: &DataFrame,
    options: &NormalizeOptions,
) -> Result<Vec<DictionaryField>> {
    options.validate()?;

    let variable_name = match &options.variable_field {
        Some(name) => name.clone(),
        None => source
            .get_columns()
            .first()
            .map(|column| column.name().to_string())
            .ok_or_else(|| ArcmapError::schema("source table has no columns"))?,
    };
    let description_name = match &options.description_field {
        Some(name) => name.clone(),
        None => infer_description_field(source).ok_or_else(|| {
            ArcmapError::schema("no string column available to use as description")
        })?,
    };

    let variable_column = required_column(source, &variable_name)?;
    let description_column = required_column(source, &description_name)?;
    let type_column = options
        .type_field
        .as_deref()
        .map(|name| required_column(source, name))
        .transpose()?;
    let response_column = options
        .response_field
        .as_deref()
        .map(|name| required_column(source, name))
        .transpose()?;

    let mut seen = BTreeSet::new();
    let mut fields = Vec::with_capacity(source.height());
    let mut unparsed_responses = 0usize;
    for idx in 0..source.height() {
        let variable = any_to_string(cell(variable_column, idx)).trim().to_string();
        if variable.is_empty() {
            return Err(ArcmapError::schema(format!(
                "row {} has an empty '{variable_name}' value",
                idx + 1
            )));
        }
        if !seen.insert(variable.clone()) {
            return Err(ArcmapError::schema(format!(
                "duplicate variable '{variable}' in column '{variable_name}'"
            )));
        }

        let description = any_to_string(cell(description_column, idx));

        let responses = match (response_column, options.response_parser) {
            (Some(column), Some(parser)) => any_to_text(cell(column, idx)).and_then(|text| {
                let parsed = parser.parse(&text);
                if parsed.is_none() {
                    unparsed_responses += 1;
                }
                parsed
            }),
            _ => None,
        };

        let data_type = type_column
            .map(|column| parse_data_type(cell(column, idx)))
            .unwrap_or_default();

        fields.push(DictionaryField {
            variable,
            description,
            responses,
            data_type,
        });
    }

    if unparsed_responses > 0 {
        debug!(
            count = unparsed_responses,
            "response cells could not be parsed and were treated as non-categorical"
        );
    }
    info!(
        fields = fields.len(),
        categorical = fields.iter().filter(|f| f.is_categorical()).count(),
        variable_field = %variable_name,
        description_field = %description_name,
        "normalized data dictionary"
    );
    Ok(fields)
}

/// Picks the string column with the greatest mean cell length.
///
/// Ties go to the earlier column. Returns `None` when no column is
/// string-typed.
pub fn infer_description_field(source: &DataFrame) -> Option<String> {
    let mut best: Option<(&Column, f64)> = None;
    for column in source.get_columns() {
        if !is_text_column(column) {
            continue;
        }
        let mean = mean_text_len(column);
        match best {
            Some((_, best_mean)) if mean <= best_mean => {}
            _ => best = Some((column, mean)),
        }
    }
    best.map(|(column, _)| column.name().to_string())
}

fn required_column<'a>(source: &'a DataFrame, name: &str) -> Result<&'a Column> {
    source
        .column(name)
        .map_err(|_| ArcmapError::schema(format!("column not found: {name}")))
}

fn cell(column: &Column, idx: usize) -> AnyValue<'_> {
    column.get(idx).unwrap_or(AnyValue::Null)
}

fn parse_data_type(value: AnyValue<'_>) -> DataType {
    let raw = any_to_string(value);
    if raw.trim().is_empty() {
        return DataType::default();
    }
    raw.parse().unwrap_or_else(|_| {
        debug!(value = %raw, "unknown type, defaulting to string");
        DataType::default()
    })
}
