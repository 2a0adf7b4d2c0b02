//! File-level steps shared by the `arcmap` commands.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use arcmap_ingest::{NormalizeOptions, normalize_dictionary, prepare_arc_schema, read_data};
use arcmap_map::{
    DEFAULT_MODEL, MappingEngine, ResourceTable, accepted_matches, format_merge, join_resource,
    read_candidates_csv, write_candidates_csv, write_candidates_json, write_responses_csv,
    write_responses_json,
};
use arcmap_model::{CandidateMatch, DictionaryField, ResponseMatch};

/// Environment variable naming the default embedding model.
pub const MODEL_ENV_VAR: &str = "ARCMAP_MODEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

/// Model name from the command line, then `ARCMAP_MODEL`, then the default.
pub fn resolve_model(flag: Option<&str>) -> String {
    resolve_model_from(flag, std::env::var(MODEL_ENV_VAR).ok())
}

pub fn resolve_model_from(flag: Option<&str>, env: Option<String>) -> String {
    flag.map(str::to_string)
        .or_else(|| env.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

/// Loads and normalizes a source dictionary. `.json` files are read as JSON
/// Schema documents, anything else as a table.
pub fn load_dictionary(path: &Path, options: &NormalizeOptions) -> Result<Vec<DictionaryField>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let fields = if is_json {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read JSON schema {}", path.display()))?;
        arcmap_ingest::read_from_jsonschema(&text)
            .with_context(|| format!("parse JSON schema {}", path.display()))?
    } else {
        let frame = read_data(path).with_context(|| format!("read {}", path.display()))?;
        normalize_dictionary(&frame, options)
            .with_context(|| format!("normalize {}", path.display()))?
    };
    info!(path = %path.display(), fields = fields.len(), "loaded source dictionary");
    Ok(fields)
}

pub fn load_arc(path: &Path, preset: Option<&str>) -> Result<Vec<DictionaryField>> {
    let frame = read_data(path).with_context(|| format!("read ARC schema {}", path.display()))?;
    let fields = prepare_arc_schema(&frame, preset)
        .with_context(|| format!("prepare ARC schema {}", path.display()))?;
    info!(path = %path.display(), fields = fields.len(), "loaded ARC schema");
    Ok(fields)
}

pub fn read_candidates(path: &Path) -> Result<Vec<CandidateMatch>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_candidates_csv(file).with_context(|| format!("read candidate table {}", path.display()))
}

pub fn write_candidates(
    rows: &[CandidateMatch],
    format: TableFormat,
    output: Option<&Path>,
) -> Result<()> {
    let writer = open_output(output)?;
    let written = match format {
        TableFormat::Csv => write_candidates_csv(writer, rows),
        TableFormat::Json => write_candidates_json(writer, rows),
    };
    written.with_context(|| format!("write candidate table to {}", describe(output)))
}

pub fn write_responses(
    rows: &[ResponseMatch],
    format: TableFormat,
    output: Option<&Path>,
) -> Result<()> {
    let writer = open_output(output)?;
    let written = match format {
        TableFormat::Csv => write_responses_csv(writer, rows),
        TableFormat::Json => write_responses_json(writer, rows),
    };
    written.with_context(|| format!("write response table to {}", describe(output)))
}

pub fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    let mut writer = open_output(output)?;
    writeln!(writer, "{text}")
        .and_then(|()| writer.flush())
        .with_context(|| format!("write {}", describe(output)))
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn describe(output: Option<&Path>) -> String {
    output.map_or_else(|| "stdout".to_string(), |path| path.display().to_string())
}

/// Parses `NAME=PATH`; a bare path takes its file stem as the name.
pub fn parse_resource_arg(value: &str) -> Result<(String, PathBuf)> {
    let (name, path) = match value.split_once('=') {
        Some((name, path)) => (name.trim().to_string(), PathBuf::from(path.trim())),
        None => {
            let path = PathBuf::from(value.trim());
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
                .unwrap_or_default();
            (name, path)
        }
    };
    if name.is_empty() || path.as_os_str().is_empty() {
        bail!("invalid resource '{value}', expected NAME=PATH");
    }
    Ok((name, path))
}

/// Accepted rows expanded to response level, joined with each resource and
/// rendered as resource blocks.
pub fn merge_resources(
    engine: &MappingEngine,
    table: &[CandidateMatch],
    resources: &[(String, PathBuf)],
    columns: Option<&[&str]>,
) -> Result<String> {
    let accepted = accepted_matches(table);
    if accepted.is_empty() {
        warn!("no accepted rows in the candidate table");
    }
    let expanded = engine
        .infer_response_mapping(&accepted)
        .context("infer response mapping")?;

    let mut merged = Vec::with_capacity(resources.len());
    for (name, path) in resources {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let resource = ResourceTable::from_csv_reader(name.as_str(), file)
            .with_context(|| format!("read resource {name} from {}", path.display()))?;
        merged.push((name.clone(), join_resource(&expanded, &resource)));
    }
    format_merge(&merged, columns).context("format merged resources")
}
