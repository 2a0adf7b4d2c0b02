//! Matching configuration.

use serde::{Deserialize, Serialize};

use arcmap_model::{ArcmapError, Result};

pub const DEFAULT_NUM_MATCHES: usize = 5;
pub const DEFAULT_THRESHOLD: f32 = 0.3;
/// Sentence embedding model used by the semantic strategy and the response
/// pass unless overridden.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Parameters shared by every strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Maximum candidates kept per source variable.
    pub num_matches: usize,
    /// Candidates must score strictly above this value.
    pub threshold: f32,
    /// Embedding model name for semantic similarity.
    pub model: String,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            num_matches: DEFAULT_NUM_MATCHES,
            threshold: DEFAULT_THRESHOLD,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl MatchOptions {
    #[must_use]
    pub fn with_num_matches(mut self, num_matches: usize) -> Self {
        self.num_matches = num_matches;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Checks ranges before any similarity work is done.
    ///
    /// # Errors
    ///
    /// [`ArcmapError::InvalidArgument`] for `num_matches == 0` or a threshold
    /// outside `(0, 1]`, [`ArcmapError::Configuration`] for an empty model
    /// name.
    pub fn validate(&self) -> Result<()> {
        if self.num_matches == 0 {
            return Err(ArcmapError::invalid_argument(
                "num_matches must be at least 1",
            ));
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ArcmapError::invalid_argument(format!(
                "threshold must lie in (0, 1], got {}",
                self.threshold
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ArcmapError::configuration("embedding model name is empty"));
        }
        Ok(())
    }
}
