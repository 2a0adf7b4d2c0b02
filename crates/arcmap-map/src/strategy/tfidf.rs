//! TF-IDF similarity.
//!
//! The vectorizer is fitted on the source texts only. Tokens are lowercase
//! runs of at least two word characters; features are unigrams plus bigrams.
//! Terms found in more than 90% of source documents are dropped, unless that
//! would leave no vocabulary at all. Weights use the smoothed idf
//! `ln((1 + n) / (1 + df)) + 1` and every document vector is L2-normalised,
//! so the dot product of two vectors is their cosine similarity.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use arcmap_model::Result;

use super::{SimilarityStrategy, StrategyKind};
use crate::matrix::SimilarityMatrix;

const MAX_DOCUMENT_FREQUENCY: f64 = 0.9;

type SparseVector = BTreeMap<usize, f64>;

/// Splits text into lowercase tokens of two or more word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

fn terms(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms = tokens.clone();
    terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}

/// Vocabulary and idf weights fitted on a corpus.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    pub fn fit(documents: &[String]) -> Self {
        let n = documents.len();
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let unique: BTreeSet<String> = terms(document).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let max_count = MAX_DOCUMENT_FREQUENCY * n as f64;
        let mut kept: Vec<(&String, usize)> = document_frequency
            .iter()
            .filter(|(_, df)| (**df as f64) <= max_count)
            .map(|(term, df)| (term, *df))
            .collect();
        if kept.is_empty() {
            debug!(
                terms = document_frequency.len(),
                "document frequency pruning removed every term; keeping full vocabulary"
            );
            kept = document_frequency
                .iter()
                .map(|(term, df)| (term, *df))
                .collect();
        }

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, (term, df)) in kept.into_iter().enumerate() {
            vocabulary.insert(term.clone(), idx);
            idf.push(((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0);
        }
        debug!(documents = n, vocabulary = vocabulary.len(), "fitted tf-idf vocabulary");
        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// L2-normalised tf-idf vector of `text`. Terms outside the vocabulary
    /// are ignored; a text with no known terms maps to the zero vector.
    fn transform(&self, text: &str) -> SparseVector {
        let mut vector = SparseVector::new();
        for term in terms(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *vector.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, weight) in &mut vector {
            *weight *= self.idf[*idx];
        }
        let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in vector.values_mut() {
                *weight /= norm;
            }
        }
        vector
    }
}

fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(idx, w)| large.get(idx).map(|v| w * v))
        .sum()
}

/// Lexical strategy registered as `tf-idf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfStrategy;

impl SimilarityStrategy for TfIdfStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TfIdf
    }

    fn similarity(&self, source: &[String], target: &[String]) -> Result<SimilarityMatrix> {
        let vectorizer = TfIdfVectorizer::fit(source);
        let source_vectors: Vec<SparseVector> =
            source.iter().map(|text| vectorizer.transform(text)).collect();
        let target_vectors: Vec<SparseVector> =
            target.iter().map(|text| vectorizer.transform(text)).collect();

        let mut values = Vec::with_capacity(source.len() * target.len());
        for s in &source_vectors {
            for t in &target_vectors {
                values.push(sparse_dot(s, t) as f32);
            }
        }
        SimilarityMatrix::new(source.len(), target.len(), values)
    }
}
