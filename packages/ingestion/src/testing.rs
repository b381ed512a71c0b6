//! Testing utilities including a mock embedding provider.
//!
//! Useful for exercising resolution and ingestion without a network or a
//! database.

use std::collections::{HashMap, HashSet};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{IngestError, Result};
use crate::traits::Embedder;

/// Deterministic mock embedding provider.
///
/// Unknown texts map to hash-seeded pseudo-random unit vectors, so
/// distinct labels land far apart (well beyond any sane similarity
/// threshold) while equal canonical forms collide exactly. Preset
/// vectors let a test place two labels deliberately close together.
pub struct MockEmbedder {
    dimension: usize,
    presets: RwLock<HashMap<String, Vec<f32>>>,
    failures: RwLock<HashSet<String>>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            presets: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashSet::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Pin a specific vector for a canonical text.
    pub fn with_embedding(self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.presets.write().unwrap().insert(text.into(), embedding);
        self
    }

    /// Make embedding this canonical text fail, simulating a provider
    /// outage for one mention.
    pub fn with_failure(self, text: impl Into<String>) -> Self {
        self.failures.write().unwrap().insert(text.into());
        self
    }

    /// Number of embed calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hashed_unit_vector(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish() | 1;
        let mut vector: Vec<f32> = (0..self.dimension)
            .map(|_| {
                // xorshift keeps the sequence deterministic per text.
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state as f32 / u64::MAX as f32) - 0.5
            })
            .collect();
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.read().unwrap().contains(text) {
            return Err(IngestError::Embedding(format!(
                "mock provider failure for '{text}'"
            )));
        }
        if let Some(preset) = self.presets.read().unwrap().get(text) {
            return Ok(preset.clone());
        }
        Ok(self.hashed_unit_vector(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
