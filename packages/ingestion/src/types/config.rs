//! Ingestion configuration.

/// Tunables for identity resolution and ingestion policy.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Maximum vector distance for two labels to be considered the same
    /// entity. Empirically tuned constant, not a derived value.
    pub similarity_threshold: f32,
    /// Whether the property pass may create chemicals it cannot resolve.
    /// The agents pass should have inserted them already, so the default
    /// is to skip-and-count instead.
    pub create_missing_chemicals: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.38,
            create_missing_chemicals: false,
        }
    }
}

impl IngestConfig {
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_create_missing_chemicals(mut self, create: bool) -> Self {
        self.create_missing_chemicals = create;
        self
    }
}
