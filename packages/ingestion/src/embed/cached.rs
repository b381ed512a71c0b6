//! Process-lifetime embedding cache.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::Embedder;

/// Caches embeddings by canonical text for the lifetime of the process.
///
/// The same handful of chemical names recurs across documents, so one
/// provider call per distinct canonical form covers an entire run. The
/// cache is shared safely across concurrent document workers.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: RwLock<HashMap<String, Vec<f32>>>,
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn cached_count(&self) -> usize {
        self.cache.read().unwrap().len()
    }
}

#[async_trait]
impl<E: Embedder> Embedder for CachedEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self.cache.read().unwrap().get(text) {
            return Ok(hit.clone());
        }
        let embedding = self.inner.embed(text).await?;
        self.cache
            .write()
            .unwrap()
            .insert(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEmbedder;

    #[tokio::test]
    async fn second_call_hits_the_cache() {
        let mock = MockEmbedder::new(8);
        let cached = CachedEmbedder::new(mock);

        let a = cached.embed("glycerol").await.unwrap();
        let b = cached.embed("glycerol").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(cached.cached_count(), 1);
        // One provider call despite two embeds.
        assert_eq!(cached.inner.call_count(), 1);
    }
}
