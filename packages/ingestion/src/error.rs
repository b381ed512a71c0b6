//! Typed errors for the ingestion library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;
use uuid::Uuid;

use crate::types::property::PropertyType;

/// Errors that can occur during ingestion operations.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Unit not in the allowed list for a property type
    #[error("unit '{unit}' not allowed for property type {property_type}")]
    InvalidUnit {
        unit: String,
        property_type: PropertyType,
    },

    /// Chemical could not be resolved and creation was disallowed
    #[error("chemical not resolved: {label}")]
    ChemicalNotFound { label: String },

    /// Experiment referenced by a formulation does not exist
    #[error("experiment '{local_id}' not found for document {document_id}")]
    ExperimentNotFound { document_id: Uuid, local_id: String },

    /// Staging batch was empty (caller bug, distinct from an empty result set)
    #[error("empty staging batch for '{destination}'")]
    EmptyBatch { destination: String },

    /// Staging destination is not a valid relation name
    #[error("invalid staging destination: {destination}")]
    InvalidDestination { destination: String },

    /// JSON serialization/parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    /// Wrap an arbitrary storage backend error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        IngestError::Storage(Box::new(err))
    }

    /// True for errors that invalidate a single fact, not the document.
    ///
    /// The ingestors skip-and-count these; everything else aborts the
    /// current document's transaction.
    pub fn is_fact_local(&self) -> bool {
        matches!(
            self,
            IngestError::InvalidUnit { .. }
                | IngestError::ChemicalNotFound { .. }
                | IngestError::ExperimentNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_local_errors_are_classified() {
        let err = IngestError::InvalidUnit {
            unit: "mol/L".into(),
            property_type: PropertyType::Density,
        };
        assert!(err.is_fact_local());

        let err = IngestError::Embedding("provider unreachable".into());
        assert!(!err.is_fact_local());
    }
}
