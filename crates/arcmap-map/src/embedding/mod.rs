//! Sentence embedding models and the process-wide model cache.
//!
//! Models are identified by name. [`ModelCache`] loads each name once through
//! a [`ModelLoader`] and hands out shared handles; callers construct the cache
//! explicitly and pass it to the engine.

mod hashed;

#[cfg(feature = "fastembed")]
mod fastembed;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use arcmap_model::{ArcmapError, Result};

use crate::matrix::SimilarityMatrix;

pub use hashed::{HASHED_DIMENSION, HASHED_MODEL, HashedNgramEmbedder};

#[cfg(feature = "fastembed")]
pub use self::fastembed::{FastEmbedder, PRETRAINED_MODELS};

/// Encodes texts into fixed-length vectors.
pub trait SentenceEmbedder: Send + Sync {
    fn model_name(&self) -> &str;

    /// Returns one vector per input text, all of the same dimension.
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Resolves a model name to a ready embedder.
pub trait ModelLoader: Send + Sync {
    fn load(&self, model: &str) -> Result<Arc<dyn SentenceEmbedder>>;
}

/// Loader for the models bundled with this crate.
///
/// `hashed-ngrams` is always available. Pretrained transformer models need
/// the `fastembed` feature; without it they fail with
/// [`ArcmapError::ModelUnavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultModelLoader;

impl ModelLoader for DefaultModelLoader {
    fn load(&self, model: &str) -> Result<Arc<dyn SentenceEmbedder>> {
        if model == HASHED_MODEL {
            return Ok(Arc::new(HashedNgramEmbedder::new()));
        }
        load_pretrained(model)
    }
}

#[cfg(feature = "fastembed")]
fn load_pretrained(model: &str) -> Result<Arc<dyn SentenceEmbedder>> {
    Ok(Arc::new(FastEmbedder::load(model)?))
}

#[cfg(not(feature = "fastembed"))]
fn load_pretrained(model: &str) -> Result<Arc<dyn SentenceEmbedder>> {
    Err(ArcmapError::ModelUnavailable {
        model: model.to_string(),
        reason: format!(
            "pretrained models need the `fastembed` feature; built-in model: {HASHED_MODEL}"
        ),
    })
}

/// Loaded embedding models keyed by name.
pub struct ModelCache {
    loader: Box<dyn ModelLoader>,
    models: Mutex<BTreeMap<String, Arc<dyn SentenceEmbedder>>>,
}

impl ModelCache {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            models: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the cached model, loading it on first use.
    ///
    /// Load failures are not cached; the next call tries again.
    pub fn get_or_load(&self, model: &str) -> Result<Arc<dyn SentenceEmbedder>> {
        let mut models = self.lock();
        if let Some(embedder) = models.get(model) {
            debug!(model, "embedding model cache hit");
            return Ok(Arc::clone(embedder));
        }
        let embedder = self.loader.load(model)?;
        info!(model, "loaded embedding model");
        models.insert(model.to_string(), Arc::clone(&embedder));
        Ok(embedder)
    }

    /// Registers an already constructed model under its own name.
    pub fn insert(&self, embedder: Arc<dyn SentenceEmbedder>) {
        let name = embedder.model_name().to_string();
        self.lock().insert(name, embedder);
    }

    /// Drops one model. Returns whether it was loaded.
    pub fn evict(&self, model: &str) -> bool {
        self.lock().remove(model).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn contains(&self, model: &str) -> bool {
        self.lock().contains_key(model)
    }

    /// Names of the loaded models in sorted order.
    pub fn loaded(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Arc<dyn SentenceEmbedder>>> {
        self.models.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new(DefaultModelLoader)
    }
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCache")
            .field("loaded", &self.loaded())
            .finish_non_exhaustive()
    }
}

/// Pairwise cosine similarity between two sets of vectors.
///
/// A zero vector has similarity 0 with everything.
pub fn cosine_matrix(source: &[Vec<f32>], target: &[Vec<f32>]) -> Result<SimilarityMatrix> {
    let target_norms: Vec<f32> = target.iter().map(|v| norm(v)).collect();
    let mut values = Vec::with_capacity(source.len() * target.len());
    for s in source {
        let s_norm = norm(s);
        for (t, t_norm) in target.iter().zip(&target_norms) {
            if s.len() != t.len() {
                return Err(ArcmapError::invalid_argument(format!(
                    "embedding dimensions differ: {} vs {}",
                    s.len(),
                    t.len()
                )));
            }
            let denom = s_norm * t_norm;
            let score = if denom > 0.0 { dot(s, t) / denom } else { 0.0 };
            values.push(score);
        }
    }
    SimilarityMatrix::new(source.len(), target.len(), values)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}
