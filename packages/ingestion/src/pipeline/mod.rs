//! Per-document ingestion pipeline.
//!
//! One `DocumentIngestor` runs the four passes for a single document in
//! order: agent mentions, intrinsic properties, experiments, formulations.
//! Entity resolution always precedes the property/formulation writes that
//! depend on it. One bad fact never aborts the run; skips are counted and
//! surfaced in the [`IngestReport`].
//!
//! Transaction discipline is the store's concern: wrap a Postgres session
//! around the ingestor so a mid-document failure leaves no partial rows,
//! and retry the whole document — every write here is an idempotent
//! upsert, so retries are safe.

mod agents;
mod experiments;
mod formulations;
mod properties;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::resolver::Resolver;
use crate::traits::{Embedder, IngestStore};
use crate::types::config::IngestConfig;
use crate::types::facts::{DocumentFacts, IngestReport};

/// Runs the normalized writes for one document against a store session.
pub struct DocumentIngestor<S, E> {
    store: S,
    embedder: E,
    resolver: Resolver,
}

impl<S: IngestStore, E: Embedder> DocumentIngestor<S, E> {
    pub fn new(store: S, embedder: E) -> Self {
        Self::with_config(store, embedder, IngestConfig::default())
    }

    pub fn with_config(store: S, embedder: E, config: IngestConfig) -> Self {
        Self {
            store,
            embedder,
            resolver: Resolver::new(config),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hand the store back, e.g. to commit a Postgres session.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Ingest everything extracted from one document.
    #[instrument(skip(self, facts), fields(document_id = %document_id))]
    pub async fn ingest_document(
        &mut self,
        document_id: Uuid,
        facts: &DocumentFacts,
    ) -> Result<IngestReport> {
        let mut report = IngestReport::new(document_id);

        self.ingest_agents(document_id, &facts.agents, &mut report)
            .await?;
        self.ingest_properties(
            document_id,
            &facts.properties,
            facts.link.as_deref(),
            &mut report,
        )
        .await?;
        self.ingest_experiments(document_id, &facts.experiments, &mut report)
            .await?;
        self.ingest_formulations(document_id, &facts.formulations, &mut report)
            .await?;

        info!(
            agents = report.agents_processed,
            properties = report.properties_attached,
            skipped = report.skipped(),
            "document ingested"
        );
        Ok(report)
    }
}
