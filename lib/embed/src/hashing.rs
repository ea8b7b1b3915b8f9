//! Local, deterministic embedder for offline runs and tests.
//!
//! Character trigrams and whole words are hashed into a fixed number of
//! buckets and the result is scaled to unit length. It captures lexical
//! overlap only, so the acceptance threshold tuned for the hosted model does
//! not transfer to it.
//!
//! Buckets come from XXH3 over the token's UTF-8 bytes, whose output is fixed
//! by the algorithm, so an index built by one release stays valid for the next.

use crate::{EmbedError, EmbeddingProvider};
use async_trait::async_trait;
use remedex_core::Vector;
use xxhash_rust::xxh3::xxh3_64;

pub const DEFAULT_HASHING_DIM: usize = 256;

const MODEL_NAME: &str = "local-hashing";

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self, EmbedError> {
        if dim == 0 {
            return Err(EmbedError::Config("hashing dimension must be positive".to_string()));
        }
        Ok(Self { dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn bucket(&self, token: &str) -> usize {
        (xxh3_64(token.as_bytes()) % self.dim as u64) as usize
    }

    fn hash_text(&self, text: &str) -> Vec<f32> {
        let mut buckets = vec![0.0f32; self.dim];
        let lowered = text.to_lowercase();

        let chars: Vec<char> = lowered.chars().collect();
        let mut trigram = String::with_capacity(12);
        for window in chars.windows(3) {
            trigram.clear();
            trigram.extend(window);
            buckets[self.bucket(&trigram)] += 1.0;
        }
        for word in lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            buckets[self.bucket(word)] += 2.0;
        }

        let magnitude = buckets.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            buckets.iter_mut().for_each(|x| *x /= magnitude);
        }
        buckets
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_HASHING_DIM,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector, EmbedError> {
        if text.trim().is_empty() {
            return Err(EmbedError::EmptyResponse);
        }
        Ok(Vector::new(self.hash_text(text)))
    }

    fn model(&self) -> &str {
        MODEL_NAME
    }
}
