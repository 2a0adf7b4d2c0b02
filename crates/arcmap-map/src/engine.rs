//! Mapping engine: strategy resolution, similarity and selection in one call.

use std::sync::Arc;

use tracing::{info, info_span};

use arcmap_model::{CandidateMatch, DictionaryField, Response, ResponseMatch, Result};

use crate::embedding::ModelCache;
use crate::options::MatchOptions;
use crate::responses;
use crate::select::{MatchSummary, select_matches};
use crate::strategy::{SimilarityStrategy, Strategy, StrategyKind};
use crate::text::similarity_texts;

/// Runs one strategy end to end: builds texts, computes the similarity
/// matrix and selects candidates.
///
/// Options are validated before any model is loaded.
pub fn run_strategy(
    kind: StrategyKind,
    source: &[DictionaryField],
    target: &[DictionaryField],
    options: &MatchOptions,
    cache: &ModelCache,
) -> Result<Vec<CandidateMatch>> {
    options.validate()?;
    let _span = info_span!("run_strategy", strategy = %kind).entered();
    if source.is_empty() || target.is_empty() {
        info!(
            source = source.len(),
            target = target.len(),
            "empty dictionary, no candidates"
        );
        return Ok(Vec::new());
    }

    let strategy = Strategy::resolve(kind, &options.model, cache)?;
    let matrix = strategy.similarity(&similarity_texts(source), &similarity_texts(target))?;
    let candidates = select_matches(
        source,
        target,
        &matrix,
        options.num_matches,
        options.threshold,
    )?;

    let summary = MatchSummary::new(source, &candidates);
    info!(
        source = summary.source_variables,
        target = target.len(),
        matched = summary.matched_variables,
        candidates = summary.candidates,
        "strategy complete"
    );
    Ok(candidates)
}

/// Engine for mapping a source dictionary onto ARC.
///
/// Holds the shared model cache and the matching options. The response pass
/// always uses the semantic model named in the options, whichever strategy
/// produced the candidate table.
#[derive(Debug, Clone)]
pub struct MappingEngine {
    cache: Arc<ModelCache>,
    options: MatchOptions,
}

impl MappingEngine {
    pub fn new(cache: Arc<ModelCache>, options: MatchOptions) -> Self {
        Self { cache, options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }

    /// Candidate table for `source` against `target`.
    pub fn suggest(
        &self,
        kind: StrategyKind,
        source: &[DictionaryField],
        target: &[DictionaryField],
    ) -> Result<Vec<CandidateMatch>> {
        run_strategy(kind, source, target, &self.options, &self.cache)
    }

    pub fn match_responses(
        &self,
        source: &[Response],
        target: &[Response],
    ) -> Result<Vec<(Response, Response)>> {
        if source.is_empty() {
            return Ok(Vec::new());
        }
        let embedder = self.cache.get_or_load(&self.options.model)?;
        responses::match_responses(embedder.as_ref(), source, target)
    }

    /// Second pass over a (reviewed) candidate table. The embedding model is
    /// only loaded when some row has responses on both sides.
    pub fn infer_response_mapping(&self, table: &[CandidateMatch]) -> Result<Vec<ResponseMatch>> {
        self.options.validate()?;
        if !table.iter().any(responses::has_response_pair) {
            return Ok(table
                .iter()
                .map(|row| ResponseMatch::from_candidate(row, None, None))
                .collect());
        }
        let embedder = self.cache.get_or_load(&self.options.model)?;
        responses::infer_response_mapping(embedder.as_ref(), table)
    }
}

impl Default for MappingEngine {
    fn default() -> Self {
        Self::new(Arc::new(ModelCache::default()), MatchOptions::default())
    }
}
