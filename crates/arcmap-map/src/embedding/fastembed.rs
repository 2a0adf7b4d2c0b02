//! Pretrained sentence transformers run through ONNX Runtime.

use std::sync::{Mutex, PoisonError};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use arcmap_model::{ArcmapError, Result};

use super::SentenceEmbedder;

/// Model names accepted by [`FastEmbedder::load`].
pub const PRETRAINED_MODELS: [&str; 3] =
    ["all-MiniLM-L6-v2", "all-MiniLM-L12-v2", "bge-small-en-v1.5"];

pub struct FastEmbedder {
    name: String,
    model: Mutex<TextEmbedding>,
}

impl FastEmbedder {
    /// Loads a pretrained model, downloading it into the fastembed cache on
    /// first use.
    pub fn load(name: &str) -> Result<Self> {
        let kind = model_kind(name).ok_or_else(|| ArcmapError::ModelUnavailable {
            model: name.to_string(),
            reason: format!("unknown model; available: {}", PRETRAINED_MODELS.join(", ")),
        })?;
        info!(model = name, "initializing pretrained embedding model");
        let model = TextEmbedding::try_new(InitOptions::new(kind).with_show_download_progress(false))
            .map_err(|err| ArcmapError::ModelUnavailable {
                model: name.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            name: name.to_string(),
            model: Mutex::new(model),
        })
    }
}

fn model_kind(name: &str) -> Option<EmbeddingModel> {
    match name {
        "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
            Some(EmbeddingModel::AllMiniLML6V2)
        }
        "all-MiniLM-L12-v2" | "sentence-transformers/all-MiniLM-L12-v2" => {
            Some(EmbeddingModel::AllMiniLML12V2)
        }
        "bge-small-en-v1.5" | "BAAI/bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
        _ => None,
    }
}

impl SentenceEmbedder for FastEmbedder {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
        model
            .embed(texts.to_vec(), None)
            .map_err(|err| ArcmapError::Embedding {
                model: self.name.clone(),
                reason: err.to_string(),
            })
    }
}
