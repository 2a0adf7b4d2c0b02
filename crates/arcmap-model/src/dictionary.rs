//! Normalized data dictionary records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::response::Response;

/// Coarse variable type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    String,
    Number,
    Categorical,
    Date,
    Multiselect,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Categorical => "categorical",
            Self::Date => "date",
            Self::Multiselect => "multiselect",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Ok(Self::String),
            "number" | "integer" | "float" => Ok(Self::Number),
            "categorical" | "enum" => Ok(Self::Categorical),
            "date" | "datetime" => Ok(Self::Date),
            "multiselect" => Ok(Self::Multiselect),
            other => Err(format!("unknown data type: {other}")),
        }
    }
}

/// One row of a normalized data dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryField {
    /// Identifier, unique within its dictionary.
    pub variable: String,
    /// Free text used as the similarity signal. May be empty.
    pub description: String,
    /// Choice list. `None` marks a non-categorical field, which is not the
    /// same as an empty list.
    pub responses: Option<Vec<Response>>,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl DictionaryField {
    pub fn new(variable: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            description: description.into(),
            responses: None,
            data_type: DataType::String,
        }
    }

    #[must_use]
    pub fn with_responses(mut self, responses: Vec<Response>) -> Self {
        self.responses = Some(responses);
        self
    }

    #[must_use]
    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// True when the field carries a choice list.
    pub fn is_categorical(&self) -> bool {
        self.responses.is_some()
    }
}

/// True when at least one field carries a choice list.
pub fn has_categorical(fields: &[DictionaryField]) -> bool {
    fields.iter().any(DictionaryField::is_categorical)
}
