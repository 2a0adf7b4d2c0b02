//! Handoff of reviewed mappings to downstream resource mappings.
//!
//! A resource mapping table (one per output resource, e.g. `Patient`) lists
//! source-side `raw_variable` / `raw_response` pairs in ARC terms together
//! with resource-specific columns. Variable cells are only filled on the
//! first row of each group, so blanks are forward-filled before joining.
//! Accepted rows join on exact equality of `arc_variable` and the rendered
//! `arc_response` (`code, label`); a row without a response joins resource
//! rows with a blank response cell.

use std::io::Read;

use tracing::{debug, warn};

use arcmap_model::{CandidateMatch, ResponseMatch};

use crate::table::TableError;

/// Columns rendered by [`format_merge`] when none are given.
pub const DEFAULT_MERGE_COLUMNS: [&str; 6] = [
    "raw_variable",
    "raw_response",
    "arc_variable",
    "arc_response",
    "raw_description",
    "arc_description",
];

const ARC_VARIABLE: &str = "arc_variable";
const ARC_RESPONSE: &str = "arc_response";

/// Columns [`MergedRow::get`] answers from the mapping side.
const MAPPING_COLUMNS: [&str; 7] = [
    "status",
    "raw_variable",
    "raw_description",
    "raw_response",
    ARC_VARIABLE,
    "arc_description",
    ARC_RESPONSE,
];

/// Appended to resource columns that share a name with a mapping column.
pub const RESOURCE_SUFFIX: &str = "_resource";

/// Rows the reviewer accepted.
pub fn accepted_matches(table: &[CandidateMatch]) -> Vec<CandidateMatch> {
    table
        .iter()
        .filter(|row| row.status.is_accepted())
        .cloned()
        .collect()
}

/// One row of a resource mapping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRow {
    pub arc_variable: String,
    pub arc_response: Option<String>,
    /// Remaining columns in table order.
    pub values: Vec<(String, String)>,
}

/// Resource mapping table keyed by ARC variable and response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<ResourceRow>,
}

impl ResourceTable {
    /// Builds a table from raw cells.
    ///
    /// `raw_variable` and `raw_response` columns are renamed to their ARC
    /// names; blank variable cells take the value of the row above. Any other
    /// column named like a mapping column gets [`RESOURCE_SUFFIX`] so both
    /// values stay addressable after the join.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, TableError> {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|column| match column.trim() {
                "raw_variable" => ARC_VARIABLE.to_string(),
                "raw_response" => ARC_RESPONSE.to_string(),
                other => other.to_string(),
            })
            .collect();
        let name: String = name.into();
        let variable_idx = columns
            .iter()
            .position(|c| c == ARC_VARIABLE)
            .ok_or_else(|| TableError::MissingColumn("raw_variable".to_string()))?;
        let response_idx = columns.iter().position(|c| c == ARC_RESPONSE);
        let columns: Vec<String> = columns
            .into_iter()
            .enumerate()
            .map(|(idx, column)| {
                let is_key = idx == variable_idx || Some(idx) == response_idx;
                if is_key || !MAPPING_COLUMNS.contains(&column.as_str()) {
                    return column;
                }
                let renamed = format!("{column}{RESOURCE_SUFFIX}");
                warn!(
                    resource = %name,
                    column = %column,
                    renamed = %renamed,
                    "resource column shadows a mapping column"
                );
                renamed
            })
            .collect();

        let mut previous = String::new();
        let mut parsed = Vec::with_capacity(rows.len());
        for cells in rows {
            let cell = |idx: usize| cells.get(idx).map_or("", |value| value.trim());
            let variable = cell(variable_idx);
            if !variable.is_empty() {
                previous = variable.to_string();
            }
            let arc_response = response_idx
                .map(cell)
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            let values = columns
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != variable_idx && Some(*idx) != response_idx)
                .map(|(idx, column)| {
                    (
                        column.clone(),
                        cells.get(idx).cloned().unwrap_or_default(),
                    )
                })
                .collect();
            parsed.push(ResourceRow {
                arc_variable: previous.clone(),
                arc_response,
                values,
            });
        }
        Ok(Self {
            name,
            columns,
            rows: parsed,
        })
    }

    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, TableError> {
        let mut input = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let columns: Vec<String> = input.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in input.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Self::new(name, columns, rows)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ResourceRow] {
        &self.rows
    }
}

/// A response-level mapping joined with one resource row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub mapping: ResponseMatch,
    pub resource: Vec<(String, String)>,
}

impl MergedRow {
    /// Value of `column`, looking at mapping columns first.
    pub fn get(&self, column: &str) -> Option<String> {
        let m = &self.mapping;
        let value = match column {
            "status" => m.status.to_string(),
            "raw_variable" => m.raw_variable.clone(),
            "raw_description" => m.raw_description.clone(),
            "raw_response" => m.raw_response.as_ref().map(ToString::to_string).unwrap_or_default(),
            ARC_VARIABLE => m.arc_variable.clone(),
            "arc_description" => m.arc_description.clone(),
            ARC_RESPONSE => m.arc_response.as_ref().map(ToString::to_string).unwrap_or_default(),
            other => {
                return self
                    .resource
                    .iter()
                    .find(|(name, _)| name == other)
                    .map(|(_, value)| value.clone());
            }
        };
        Some(value)
    }
}

/// Inner join of mappings with a resource table, in mapping order.
pub fn join_resource(rows: &[ResponseMatch], resource: &ResourceTable) -> Vec<MergedRow> {
    let mut merged = Vec::new();
    for row in rows {
        let (variable, response) = row.join_key();
        for candidate in resource
            .rows
            .iter()
            .filter(|r| r.arc_variable == variable && r.arc_response == response)
        {
            merged.push(MergedRow {
                mapping: row.clone(),
                resource: candidate.values.clone(),
            });
        }
    }
    if merged.is_empty() && !rows.is_empty() {
        warn!(resource = resource.name(), "no accepted mapping matched the resource table");
    }
    debug!(
        resource = resource.name(),
        mappings = rows.len(),
        merged = merged.len(),
        "joined resource"
    );
    merged
}

/// Renders joined resources as `{{{ resource <Name>` blocks of
/// tab-separated values.
///
/// # Errors
///
/// [`TableError::MissingColumn`] when a selected column exists neither in the
/// mapping nor in the resource.
pub fn format_merge(
    merged: &[(String, Vec<MergedRow>)],
    columns: Option<&[&str]>,
) -> Result<String, TableError> {
    let columns = columns.unwrap_or(&DEFAULT_MERGE_COLUMNS);
    let mut out = String::new();
    for (resource, rows) in merged {
        let mut bytes = Vec::new();
        {
            let mut tsv = csv::WriterBuilder::new()
                .delimiter(b'\t')
                .from_writer(&mut bytes);
            tsv.write_record(columns)?;
            for row in rows {
                let mut record = Vec::with_capacity(columns.len());
                for column in columns {
                    record.push(
                        row.get(column)
                            .ok_or_else(|| TableError::MissingColumn((*column).to_string()))?,
                    );
                }
                tsv.write_record(&record)?;
            }
            tsv.flush()?;
        }
        out.push_str("{{{ resource ");
        out.push_str(resource);
        out.push('\n');
        out.push_str(&String::from_utf8_lossy(&bytes));
        out.push_str("}}}\n");
    }
    Ok(out.trim().to_string())
}
