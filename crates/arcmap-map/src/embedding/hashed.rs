//! Feature-hashed character trigram embeddings.
//!
//! No download and no training: each word is wrapped as `#word#`, split into
//! character trigrams, and every trigram is hashed into one of
//! [`HASHED_DIMENSION`] signed buckets. Related spellings share trigrams, so
//! `male` and `female` land close together while `age` does not.

use sha2::{Digest, Sha256};

use arcmap_model::Result;

use super::SentenceEmbedder;

pub const HASHED_MODEL: &str = "hashed-ngrams";
pub const HASHED_DIMENSION: usize = 256;

#[derive(Debug, Clone, Copy, Default)]
pub struct HashedNgramEmbedder;

impl HashedNgramEmbedder {
    pub fn new() -> Self {
        Self
    }

    fn embed_one(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; HASHED_DIMENSION];
        let lowered = text.to_lowercase();
        for word in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                let (bucket, sign) = hash_gram(&gram);
                vector[bucket] += sign;
            }
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

fn hash_gram(gram: &str) -> (usize, f32) {
    let digest = Sha256::digest(gram.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    let bucket = (u64::from_le_bytes(bytes) % HASHED_DIMENSION as u64) as usize;
    let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
    (bucket, sign)
}

impl SentenceEmbedder for HashedNgramEmbedder {
    fn model_name(&self) -> &str {
        HASHED_MODEL
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| Self::embed_one(text)).collect())
    }
}
