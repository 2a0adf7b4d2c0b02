//! Candidate selection from a similarity matrix.

use std::collections::BTreeSet;

use tracing::debug;

use arcmap_model::{ArcmapError, CandidateMatch, DictionaryField, Result, has_categorical};

use crate::matrix::SimilarityMatrix;

/// Turns a similarity matrix into a candidate table.
///
/// For each source field, in source order:
/// 1. target indices are sorted by descending similarity (ties keep target
///    order) and the first `num_matches` are taken;
/// 2. only scores strictly above `threshold` survive;
/// 3. when any source field carries responses, pairs where exactly one side
///    is categorical are dropped;
/// 4. survivors are ranked from 0 in that order.
///
/// # Errors
///
/// [`ArcmapError::InvalidArgument`] when `num_matches` is 0 or the matrix
/// shape does not match the dictionaries.
pub fn select_matches(
    source: &[DictionaryField],
    target: &[DictionaryField],
    matrix: &SimilarityMatrix,
    num_matches: usize,
    threshold: f32,
) -> Result<Vec<CandidateMatch>> {
    if num_matches == 0 {
        return Err(ArcmapError::invalid_argument("num_matches must be at least 1"));
    }
    if source.is_empty() || target.is_empty() {
        return Ok(Vec::new());
    }
    if matrix.shape() != (source.len(), target.len()) {
        return Err(ArcmapError::invalid_argument(format!(
            "similarity matrix is {}x{} but dictionaries are {}x{}",
            matrix.rows(),
            matrix.cols(),
            source.len(),
            target.len()
        )));
    }

    let filter_types = has_categorical(source);
    let mut candidates = Vec::new();
    for (row, source_field) in source.iter().enumerate() {
        let scores = matrix.row(row);
        let survivors = matrix
            .ranked(row)
            .into_iter()
            .take(num_matches)
            .filter(|&col| scores[col] > threshold)
            .filter(|&col| {
                !filter_types || source_field.is_categorical() == target[col].is_categorical()
            });
        for (rank, col) in survivors.enumerate() {
            candidates.push(CandidateMatch::from_fields(source_field, &target[col], rank));
        }
    }
    debug!(
        source = source.len(),
        target = target.len(),
        candidates = candidates.len(),
        type_filter = filter_types,
        "selected candidate matches"
    );
    Ok(candidates)
}

/// Coverage of a candidate table over its source dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub source_variables: usize,
    pub matched_variables: usize,
    pub candidates: usize,
    /// Source variables with no surviving candidate, in source order.
    pub unmatched_variables: Vec<String>,
}

impl MatchSummary {
    pub fn new(source: &[DictionaryField], candidates: &[CandidateMatch]) -> Self {
        let matched: BTreeSet<&str> = candidates
            .iter()
            .map(|c| c.raw_variable.as_str())
            .collect();
        let unmatched_variables: Vec<String> = source
            .iter()
            .filter(|field| !matched.contains(field.variable.as_str()))
            .map(|field| field.variable.clone())
            .collect();
        Self {
            source_variables: source.len(),
            matched_variables: source.len() - unmatched_variables.len(),
            candidates: candidates.len(),
            unmatched_variables,
        }
    }
}
