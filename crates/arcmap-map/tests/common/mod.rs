#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arcmap_map::{ModelLoader, SentenceEmbedder};
use arcmap_model::{ArcmapError, DictionaryField, Response, Result};

pub const LEXICON_MODEL: &str = "lexicon";

const CONCEPTS: [&[&str]; 5] = [
    &["female", "females", "woman", "women", "girl"],
    &["male", "males", "man", "men", "boy"],
    &["unknown", "missing", "unsure"],
    &["yes", "present", "true"],
    &["no", "absent", "false"],
];

/// Bag-of-concepts embedder: each known word adds one to its concept's
/// dimension. Words outside the lexicon are ignored.
pub struct LexiconEmbedder;

impl SentenceEmbedder for LexiconEmbedder {
    fn model_name(&self) -> &str {
        LEXICON_MODEL
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0; CONCEPTS.len()];
                for word in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
                    if let Some(idx) = CONCEPTS.iter().position(|words| words.contains(&word)) {
                        vector[idx] += 1.0;
                    }
                }
                vector
            })
            .collect())
    }
}

/// Serves [`LexiconEmbedder`] and counts how often it is asked to load.
pub struct CountingLoader {
    pub loads: Arc<AtomicUsize>,
}

impl CountingLoader {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                loads: Arc::clone(&loads),
            },
            loads,
        )
    }
}

impl ModelLoader for CountingLoader {
    fn load(&self, model: &str) -> Result<Arc<dyn SentenceEmbedder>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if model == LEXICON_MODEL {
            Ok(Arc::new(LexiconEmbedder))
        } else {
            Err(ArcmapError::ModelUnavailable {
                model: model.to_string(),
                reason: "test loader only serves the lexicon model".to_string(),
            })
        }
    }
}

pub fn responses(pairs: &[(&str, &str)]) -> Vec<Response> {
    pairs.iter().map(|&pair| Response::from(pair)).collect()
}

pub fn field(variable: &str, description: &str) -> DictionaryField {
    DictionaryField::new(variable, description)
}

pub fn categorical(variable: &str, description: &str, pairs: &[(&str, &str)]) -> DictionaryField {
    field(variable, description).with_responses(responses(pairs))
}
