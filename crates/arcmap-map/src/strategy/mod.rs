//! Similarity strategies and the registry of their names.

mod semantic;
mod tfidf;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use arcmap_model::{ArcmapError, Result};

use crate::embedding::{ModelCache, SentenceEmbedder};
use crate::matrix::SimilarityMatrix;

pub use semantic::SemanticStrategy;
pub(crate) use semantic::encode_checked;
pub use tfidf::{TfIdfStrategy, TfIdfVectorizer, tokenize};

/// Registered strategy keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Lexical overlap weighted by inverse document frequency.
    #[serde(rename = "tf-idf")]
    TfIdf,
    /// Cosine similarity of sentence embeddings.
    #[serde(rename = "sbert")]
    Sbert,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::TfIdf, StrategyKind::Sbert];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TfIdf => "tf-idf",
            Self::Sbert => "sbert",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::TfIdf => "TF-IDF vectors fitted on the source dictionary (unigrams and bigrams)",
            Self::Sbert => "cosine similarity of sentence embeddings",
        }
    }

    pub fn uses_embeddings(self) -> bool {
        matches!(self, Self::Sbert)
    }

    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ArcmapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| ArcmapError::UnsupportedStrategy {
                key: s.to_string(),
                expected: Self::expected(),
            })
    }
}

/// Scores every (source, target) text pair.
pub trait SimilarityStrategy {
    fn kind(&self) -> StrategyKind;

    /// Returns a `|source| x |target|` matrix; higher means more related.
    fn similarity(&self, source: &[String], target: &[String]) -> Result<SimilarityMatrix>;
}

/// A ready-to-run strategy.
pub enum Strategy {
    TfIdf(TfIdfStrategy),
    Semantic(SemanticStrategy),
}

impl Strategy {
    /// Builds the strategy for `kind`, loading the embedding model through
    /// `cache` when one is needed.
    pub fn resolve(kind: StrategyKind, model: &str, cache: &ModelCache) -> Result<Self> {
        match kind {
            StrategyKind::TfIdf => Ok(Self::TfIdf(TfIdfStrategy)),
            StrategyKind::Sbert => Ok(Self::Semantic(SemanticStrategy::new(
                cache.get_or_load(model)?,
            ))),
        }
    }

    pub fn semantic(embedder: Arc<dyn SentenceEmbedder>) -> Self {
        Self::Semantic(SemanticStrategy::new(embedder))
    }
}

impl SimilarityStrategy for Strategy {
    fn kind(&self) -> StrategyKind {
        match self {
            Self::TfIdf(strategy) => strategy.kind(),
            Self::Semantic(strategy) => strategy.kind(),
        }
    }

    fn similarity(&self, source: &[String], target: &[String]) -> Result<SimilarityMatrix> {
        match self {
            Self::TfIdf(strategy) => strategy.similarity(source, target),
            Self::Semantic(strategy) => strategy.similarity(source, target),
        }
    }
}
