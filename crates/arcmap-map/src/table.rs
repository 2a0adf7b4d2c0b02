//! Candidate and response tables on disk.
//!
//! CSV columns are, in order: `status, raw_variable, raw_description,
//! raw_response, arc_variable, arc_description, arc_response` and, for
//! candidate tables, `rank`. Choice lists are written in REDCap form
//! (`1, male | 2, female`) unless a code or label would not read back from
//! it, in which case the cell holds a JSON array of `[code, label]` pairs
//! (`[["IV|IM", "IV|IM"]]`). An empty cell means no responses. JSON output
//! is the serde representation with responses as `{code, label}` objects.

use std::io::{Read, Write};

use csv::StringRecord;
use thiserror::Error;
use tracing::debug;

use arcmap_model::{
    CandidateMatch, Response, ResponseMatch, ReviewStatus, format_responses, parse_redcap,
};

pub const CANDIDATE_COLUMNS: [&str; 8] = [
    "status",
    "raw_variable",
    "raw_description",
    "raw_response",
    "arc_variable",
    "arc_description",
    "arc_response",
    "rank",
];

pub const RESPONSE_COLUMNS: [&str; 7] = [
    "status",
    "raw_variable",
    "raw_description",
    "raw_response",
    "arc_variable",
    "arc_description",
    "arc_response",
];

const REQUIRED_COLUMNS: [&str; 2] = ["raw_variable", "arc_variable"];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("required column not found: {0}")]
    MissingColumn(String),

    #[error("invalid row {line}: {message}")]
    InvalidRow { line: u64, message: String },
}

pub fn write_candidates_csv<W: Write>(writer: W, rows: &[CandidateMatch]) -> Result<(), TableError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CANDIDATE_COLUMNS)?;
    for row in rows {
        let raw_response = responses_cell(row.raw_response.as_deref())?;
        let arc_response = responses_cell(row.arc_response.as_deref())?;
        let rank = row.rank.to_string();
        out.write_record([
            row.status.as_str(),
            row.raw_variable.as_str(),
            row.raw_description.as_str(),
            raw_response.as_str(),
            row.arc_variable.as_str(),
            row.arc_description.as_str(),
            arc_response.as_str(),
            rank.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_responses_csv<W: Write>(writer: W, rows: &[ResponseMatch]) -> Result<(), TableError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(RESPONSE_COLUMNS)?;
    for row in rows {
        let raw_response = response_cell(row.raw_response.as_ref());
        let arc_response = response_cell(row.arc_response.as_ref());
        out.write_record([
            row.status.as_str(),
            row.raw_variable.as_str(),
            row.raw_description.as_str(),
            raw_response.as_str(),
            row.arc_variable.as_str(),
            row.arc_description.as_str(),
            arc_response.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_candidates_json<W: Write>(mut writer: W, rows: &[CandidateMatch]) -> Result<(), TableError> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn write_responses_json<W: Write>(mut writer: W, rows: &[ResponseMatch]) -> Result<(), TableError> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads a candidate table back, typically after review.
///
/// Only `raw_variable` and `arc_variable` are required. Missing optional
/// columns default to an unreviewed status, empty descriptions, no responses
/// and rank 0. Response cells that are not valid choice lists read as none.
pub fn read_candidates_csv<R: Read>(reader: R) -> Result<Vec<CandidateMatch>, TableError> {
    let mut input = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = ColumnIndex::new(input.headers()?)?;

    let mut rows = Vec::new();
    for (idx, record) in input.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = record.position().map_or(idx as u64 + 2, csv::Position::line);
        rows.push(columns.candidate(&record, line)?);
    }
    debug!(rows = rows.len(), "read candidate table");
    Ok(rows)
}

struct ColumnIndex {
    positions: [Option<usize>; 8],
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Result<Self, TableError> {
        let mut positions = [None; 8];
        for (slot, name) in positions.iter_mut().zip(CANDIDATE_COLUMNS) {
            *slot = headers.iter().position(|h| h.trim() == name);
        }
        for required in REQUIRED_COLUMNS {
            if headers.iter().all(|h| h.trim() != required) {
                return Err(TableError::MissingColumn(required.to_string()));
            }
        }
        Ok(Self { positions })
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: usize) -> &'r str {
        self.positions[column]
            .and_then(|pos| record.get(pos))
            .unwrap_or("")
    }

    fn candidate(&self, record: &StringRecord, line: u64) -> Result<CandidateMatch, TableError> {
        let status = self
            .cell(record, 0)
            .parse::<ReviewStatus>()
            .map_err(|message| TableError::InvalidRow { line, message })?;
        let rank_cell = self.cell(record, 7).trim();
        let rank = if rank_cell.is_empty() {
            0
        } else {
            rank_cell.parse::<usize>().map_err(|err| TableError::InvalidRow {
                line,
                message: format!("invalid rank '{rank_cell}': {err}"),
            })?
        };
        Ok(CandidateMatch {
            status,
            raw_variable: self.cell(record, 1).to_string(),
            raw_description: self.cell(record, 2).to_string(),
            raw_response: parse_responses_cell(self.cell(record, 3)),
            arc_variable: self.cell(record, 4).to_string(),
            arc_description: self.cell(record, 5).to_string(),
            arc_response: parse_responses_cell(self.cell(record, 6)),
            rank,
        })
    }
}

fn responses_cell(responses: Option<&[Response]>) -> Result<String, TableError> {
    match responses {
        None | Some([]) => Ok(String::new()),
        Some(list) if survives_redcap(list) => Ok(format_responses(list)),
        Some(list) => {
            let pairs: Vec<(&str, &str)> = list
                .iter()
                .map(|r| (r.code.as_str(), r.label.as_str()))
                .collect();
            Ok(serde_json::to_string(&pairs)?)
        }
    }
}

/// True when `parse_redcap(format_responses(list))` gives `list` back and
/// the cell cannot be mistaken for the JSON form.
fn survives_redcap(list: &[Response]) -> bool {
    let trimmed = |value: &str| value.trim() == value;
    list.first().is_none_or(|first| !first.code.starts_with('['))
        && list.iter().all(|r| {
            !r.code.contains([',', '|'])
                && !r.label.contains('|')
                && trimmed(&r.code)
                && trimmed(&r.label)
        })
}

fn response_cell(response: Option<&Response>) -> String {
    response.map(Response::to_string).unwrap_or_default()
}

fn parse_responses_cell(cell: &str) -> Option<Vec<Response>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if cell.starts_with('[')
        && let Ok(pairs) = serde_json::from_str::<Vec<(String, String)>>(cell)
    {
        return (!pairs.is_empty())
            .then(|| pairs.into_iter().map(|(code, label)| Response::new(code, label)).collect());
    }
    parse_redcap(cell)
}
