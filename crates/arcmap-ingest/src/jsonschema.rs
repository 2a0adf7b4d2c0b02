//! Data dictionaries described as JSON Schema objects.
//!
//! Each entry under `properties` becomes one field. An `enum` makes the
//! field categorical with identical code and label for every value.

use serde_json::Value;

use arcmap_model::{ArcmapError, DataType, DictionaryField, Response};

use crate::error::Result;

/// Reads a dictionary from JSON Schema text, keeping property order.
pub fn read_from_jsonschema(text: &str) -> Result<Vec<DictionaryField>> {
    let schema: Value = serde_json::from_str(text)?;
    dictionary_from_jsonschema(&schema)
}

/// Reads a dictionary from an already parsed JSON Schema document.
pub fn dictionary_from_jsonschema(schema: &Value) -> Result<Vec<DictionaryField>> {
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| ArcmapError::schema("JSON schema has no 'properties' object"))?;

    let mut fields = Vec::with_capacity(properties.len());
    for (variable, property) in properties {
        let description = property
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let field = match property.get("enum").and_then(Value::as_array) {
            Some(values) => DictionaryField::new(variable.clone(), description)
                .with_responses(values.iter().map(enum_response).collect())
                .with_type(DataType::Categorical),
            None => {
                let data_type = property
                    .get("type")
                    .and_then(Value::as_str)
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or_default();
                DictionaryField::new(variable.clone(), description).with_type(data_type)
            }
        };
        fields.push(field);
    }
    Ok(fields)
}

fn enum_response(value: &Value) -> Response {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Response::new(text.clone(), text)
}
