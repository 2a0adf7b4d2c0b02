use std::sync::Arc;

use tracing::debug;

use arcmap_model::{ArcmapError, Result};

use super::{SimilarityStrategy, StrategyKind};
use crate::embedding::{SentenceEmbedder, cosine_matrix};
use crate::matrix::SimilarityMatrix;

/// Cosine similarity of sentence embeddings.
pub struct SemanticStrategy {
    embedder: Arc<dyn SentenceEmbedder>,
}

impl SemanticStrategy {
    pub fn new(embedder: Arc<dyn SentenceEmbedder>) -> Self {
        Self { embedder }
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }
}

impl SimilarityStrategy for SemanticStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sbert
    }

    fn similarity(&self, source: &[String], target: &[String]) -> Result<SimilarityMatrix> {
        let source_vectors = encode_checked(self.embedder.as_ref(), source)?;
        let target_vectors = encode_checked(self.embedder.as_ref(), target)?;
        debug!(
            model = self.model_name(),
            source = source.len(),
            target = target.len(),
            "encoded texts"
        );
        cosine_matrix(&source_vectors, &target_vectors)
    }
}

/// Encodes `texts`, checking the model returned one vector per text.
pub(crate) fn encode_checked(
    embedder: &dyn SentenceEmbedder,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let vectors = embedder.encode(texts)?;
    if vectors.len() != texts.len() {
        return Err(ArcmapError::Embedding {
            model: embedder.model_name().to_string(),
            reason: format!("returned {} vectors for {} texts", vectors.len(), texts.len()),
        });
    }
    Ok(vectors)
}
