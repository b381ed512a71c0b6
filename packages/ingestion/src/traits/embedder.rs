//! Embedding provider abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// Maps canonical text to a fixed-length vector.
///
/// The provider is the engine's only external network dependency; a
/// failure here propagates as a resolution failure for the single mention
/// being processed. Caller-level timeout/retry applies outside the engine.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one canonicalized text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Vector dimensionality this provider produces.
    fn dimension(&self) -> usize {
        1536
    }
}

#[async_trait]
impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text).await
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}
