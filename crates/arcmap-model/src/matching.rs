//! Candidate match tables produced by the engine and edited during review.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dictionary::DictionaryField;
use crate::response::Response;

/// Review state of a candidate row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewStatus {
    /// Not reviewed yet. Rendered as `-`.
    #[default]
    #[serde(rename = "-")]
    Unreviewed,
    #[serde(rename = "y")]
    Accepted,
    #[serde(rename = "n")]
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unreviewed => "-",
            Self::Accepted => "y",
            Self::Rejected => "n",
        }
    }

    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "-" => Ok(Self::Unreviewed),
            "y" | "yes" | "true" | "1" | "accepted" => Ok(Self::Accepted),
            "n" | "no" | "false" | "0" | "rejected" => Ok(Self::Rejected),
            other => Err(format!("invalid review status: {other}")),
        }
    }
}

/// One proposed correspondence between a source variable and an ARC variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub status: ReviewStatus,
    pub raw_variable: String,
    pub raw_description: String,
    pub raw_response: Option<Vec<Response>>,
    pub arc_variable: String,
    pub arc_description: String,
    pub arc_response: Option<Vec<Response>>,
    /// Position among the surviving candidates of `raw_variable`; 0 is best.
    pub rank: usize,
}

impl CandidateMatch {
    /// Builds an unreviewed row from a source and a target field.
    pub fn from_fields(source: &DictionaryField, target: &DictionaryField, rank: usize) -> Self {
        Self {
            status: ReviewStatus::Unreviewed,
            raw_variable: source.variable.clone(),
            raw_description: source.description.clone(),
            raw_response: source.responses.clone(),
            arc_variable: target.variable.clone(),
            arc_description: target.description.clone(),
            arc_response: target.responses.clone(),
            rank,
        }
    }
}

/// A candidate row expanded to response level by the second matching pass.
///
/// Rows whose variables are not both categorical keep `None` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMatch {
    pub status: ReviewStatus,
    pub raw_variable: String,
    pub raw_description: String,
    pub raw_response: Option<Response>,
    pub arc_variable: String,
    pub arc_description: String,
    pub arc_response: Option<Response>,
}

impl ResponseMatch {
    pub fn from_candidate(
        candidate: &CandidateMatch,
        raw_response: Option<Response>,
        arc_response: Option<Response>,
    ) -> Self {
        Self {
            status: candidate.status,
            raw_variable: candidate.raw_variable.clone(),
            raw_description: candidate.raw_description.clone(),
            raw_response,
            arc_variable: candidate.arc_variable.clone(),
            arc_description: candidate.arc_description.clone(),
            arc_response,
        }
    }

    /// Key used by downstream consumers: exact equality on the ARC variable
    /// and the rendered ARC response.
    pub fn join_key(&self) -> (String, Option<String>) {
        (
            self.arc_variable.clone(),
            self.arc_response.as_ref().map(Response::to_string),
        )
    }
}
