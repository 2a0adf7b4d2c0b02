//! Data dictionary ingestion: local file reading, normalization, JSON Schema
//! dictionaries and ARC schema preparation.

pub mod arc;
pub mod dictionary;
pub mod error;
pub mod jsonschema;
pub mod polars_utils;
pub mod read;

pub use arc::{arc_data_type, arc_schema_url, prepare_arc_schema};
pub use dictionary::{NormalizeOptions, infer_description_field, normalize_dictionary};
pub use error::{IngestError, Result};
pub use jsonschema::{dictionary_from_jsonschema, read_from_jsonschema};
pub use polars_utils::{any_to_string, any_to_text, format_numeric};
pub use read::read_data;
