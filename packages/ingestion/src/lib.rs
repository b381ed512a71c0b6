//! Chemical Entity Resolution & Ingestion Engine
//!
//! Ingests facts extracted from scientific documents (by external
//! language-model passes) into a normalized relational store describing
//! chemical agents, their intrinsic properties, experiments, and
//! formulations. The heart of the crate is identity resolution: deciding,
//! for every incoming chemical mention (free-text label plus optional
//! InChIKey), whether it refers to an already-known chemical or a new
//! one, then performing idempotent, referentially consistent writes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ingestion::{DocumentIngestor, MemoryStore, testing::MockEmbedder};
//!
//! let store = MemoryStore::new();
//! let embedder = MockEmbedder::new(1536);
//! let mut ingestor = DocumentIngestor::new(store, embedder);
//! let report = ingestor.ingest_document(document_id, &facts).await?;
//! println!("skipped {} facts", report.skipped());
//! ```
//!
//! With the `postgres` feature, open a per-document session so a failure
//! partway through a document leaves no partial rows:
//!
//! ```rust,ignore
//! let store = PostgresStore::new(&database_url).await?;
//! let mut ingestor = DocumentIngestor::new(store.session().await?, embedder);
//! let report = ingestor.ingest_document(document_id, &facts).await?;
//! ingestor.into_store().commit().await?;
//! ```
//!
//! # Modules
//!
//! - [`resolver`] - identity resolution over the alias registry
//! - [`pipeline`] - per-document ingestion passes
//! - [`traits`] - embedding provider and storage seams
//! - [`types`] - domain types (chemicals, properties, fact values)
//! - [`stores`] - storage implementations (memory, Postgres/pgvector)
//! - [`embed`] - embedding providers and the process-lifetime cache
//! - [`testing`] - mock embedder for tests

pub mod embed;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

pub use embed::CachedEmbedder;
pub use error::{IngestError, Result};
pub use pipeline::DocumentIngestor;
pub use resolver::{LookupHit, Resolver};
pub use stores::MemoryStore;
pub use traits::{
    ChemicalRegistry, ComponentRow, Embedder, ExperimentStore, IngestStore, PropertyStore,
    StagingSink,
};
pub use types::{
    AgentMention, ChemicalRole, ComponentRecord, DocumentFacts, ExperimentRecord, FactValue,
    FormulationRecord, IngestConfig, IngestReport, PropertyFact, PropertyType, Resolution,
    ValueKind,
};

#[cfg(feature = "postgres")]
pub use stores::{PostgresSession, PostgresStore};

#[cfg(feature = "openai")]
pub use embed::OpenAiEmbedder;
