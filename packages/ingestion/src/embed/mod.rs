//! Embedding providers.

mod cached;

#[cfg(feature = "openai")]
mod openai;

pub use cached::CachedEmbedder;

#[cfg(feature = "openai")]
pub use openai::OpenAiEmbedder;
