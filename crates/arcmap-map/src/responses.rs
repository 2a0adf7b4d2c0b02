//! Response-level matching for categorical fields.

use tracing::{debug, info};

use arcmap_model::{ArcmapError, CandidateMatch, Response, ResponseMatch, Result};

use crate::embedding::{SentenceEmbedder, cosine_matrix};
use crate::strategy::encode_checked;

/// Pairs every source response with its closest target response.
///
/// Labels are embedded with `embedder`; codes are carried through untouched.
/// Each source response independently takes the most similar target (the
/// first one on ties), so two source responses may share a target.
///
/// # Errors
///
/// [`ArcmapError::InvalidArgument`] when `target` is empty but `source` is
/// not, plus any error raised by the embedder.
pub fn match_responses(
    embedder: &dyn SentenceEmbedder,
    source: &[Response],
    target: &[Response],
) -> Result<Vec<(Response, Response)>> {
    if source.is_empty() {
        return Ok(Vec::new());
    }
    if target.is_empty() {
        return Err(ArcmapError::invalid_argument(
            "cannot match responses against an empty target list",
        ));
    }
    let source_labels: Vec<String> = source.iter().map(|r| r.label.clone()).collect();
    let target_labels: Vec<String> = target.iter().map(|r| r.label.clone()).collect();
    let matrix = cosine_matrix(
        &encode_checked(embedder, &source_labels)?,
        &encode_checked(embedder, &target_labels)?,
    )?;

    Ok(source
        .iter()
        .enumerate()
        .map(|(row, response)| {
            let scores = matrix.row(row);
            let mut best = 0;
            for (col, score) in scores.iter().enumerate().skip(1) {
                if *score > scores[best] {
                    best = col;
                }
            }
            (response.clone(), target[best].clone())
        })
        .collect())
}

/// True when both sides of `row` carry a non-empty choice list.
pub fn has_response_pair(row: &CandidateMatch) -> bool {
    matches!(
        (&row.raw_response, &row.arc_response),
        (Some(raw), Some(arc)) if !raw.is_empty() && !arc.is_empty()
    )
}

/// Expands a candidate table to response level.
///
/// Rows where both sides carry a non-empty choice list become one row per
/// source response; every other row passes through with no responses.
/// Review status is carried onto every emitted row.
pub fn infer_response_mapping(
    embedder: &dyn SentenceEmbedder,
    table: &[CandidateMatch],
) -> Result<Vec<ResponseMatch>> {
    let mut out = Vec::with_capacity(table.len());
    let mut expanded = 0usize;
    for row in table {
        match (&row.raw_response, &row.arc_response) {
            (Some(raw), Some(arc)) if has_response_pair(row) => {
                expanded += 1;
                let pairs = match_responses(embedder, raw, arc)?;
                debug!(
                    raw_variable = %row.raw_variable,
                    arc_variable = %row.arc_variable,
                    responses = pairs.len(),
                    "matched responses"
                );
                out.extend(
                    pairs
                        .into_iter()
                        .map(|(s, t)| ResponseMatch::from_candidate(row, Some(s), Some(t))),
                );
            }
            _ => out.push(ResponseMatch::from_candidate(row, None, None)),
        }
    }
    info!(
        rows = table.len(),
        categorical_rows = expanded,
        output_rows = out.len(),
        model = embedder.model_name(),
        "inferred response mapping"
    );
    Ok(out)
}
