//! Core trait abstractions: the embedding provider and the storage seams.

pub mod embedder;
pub mod store;

pub use embedder::Embedder;
pub use store::{
    ChemicalRegistry, ComponentRow, ExperimentStore, IngestStore, PropertyStore, StagingSink,
};
