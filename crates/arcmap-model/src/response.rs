//! Categorical responses and the parsers that read them from dictionary cells.
//!
//! A categorical field stores a code in the dataset and shows a label to
//! people. REDCap packs the whole choice list into one cell:
//!
//! ```text
//! 1, Male | 2, Female | 3, Unknown
//! ```
//!
//! Similarity is only ever computed on labels; codes are carried through
//! untouched so the final mapping still refers to the stored values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArcmapError;

/// A (code, label) pair from a categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Response {
    /// Value stored in the dataset (e.g. "1").
    pub code: String,
    /// Human-readable text used for similarity (e.g. "male").
    pub label: String,
}

impl Response {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.code, self.label)
    }
}

impl From<(&str, &str)> for Response {
    fn from((code, label): (&str, &str)) -> Self {
        Self::new(code, label)
    }
}

/// Named parsers for response cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseParser {
    /// `code, label | code, label` choice lists.
    Redcap,
}

impl ResponseParser {
    pub const ALL: [ResponseParser; 1] = [ResponseParser::Redcap];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Redcap => "redcap",
        }
    }

    /// Parses one cell. `None` means the cell is not a valid choice list.
    pub fn parse(self, cell: &str) -> Option<Vec<Response>> {
        match self {
            Self::Redcap => parse_redcap(cell),
        }
    }
}

impl fmt::Display for ResponseParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseParser {
    type Err = ArcmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redcap" => Ok(Self::Redcap),
            other => Err(ArcmapError::configuration(format!(
                "unknown response parser: {other}"
            ))),
        }
    }
}

/// Parses a REDCap choice list.
///
/// Entries are separated by `|`; each entry is split on its first `,` into
/// code and label, both trimmed. Returns `None` when an entry has no comma.
pub fn parse_redcap(cell: &str) -> Option<Vec<Response>> {
    cell.split('|')
        .map(|entry| {
            let (code, label) = entry.split_once(',')?;
            Some(Response::new(code.trim(), label.trim()))
        })
        .collect()
}

/// Renders responses back into REDCap form, the inverse of [`parse_redcap`].
pub fn format_responses(responses: &[Response]) -> String {
    responses
        .iter()
        .map(Response::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redcap_splits_entries_and_trims() {
        assert_eq!(
            parse_redcap("1, male | 2, female"),
            Some(vec![Response::new("1", "male"), Response::new("2", "female")])
        );
    }

    #[test]
    fn redcap_splits_on_first_comma_only() {
        assert_eq!(
            parse_redcap("1, Yes, confirmed|2, No"),
            Some(vec![
                Response::new("1", "Yes, confirmed"),
                Response::new("2", "No")
            ])
        );
    }

    #[test]
    fn redcap_rejects_entries_without_comma() {
        assert_eq!(parse_redcap("1, male | female"), None);
        assert_eq!(parse_redcap("calc(age)"), None);
    }

    #[test]
    fn format_is_inverse_of_parse() {
        let cell = "1, male | 2, female";
        let parsed = parse_redcap(cell).unwrap();
        assert_eq!(format_responses(&parsed), cell);
    }

    #[test]
    fn parser_from_str() {
        assert_eq!("REDCap".parse::<ResponseParser>(), Ok(ResponseParser::Redcap));
        assert!(matches!(
            "odm".parse::<ResponseParser>(),
            Err(ArcmapError::Configuration(_))
        ));
    }
}
