//! Experiment pass: document-scoped experiment headers.

use tracing::instrument;
use uuid::Uuid;

use super::DocumentIngestor;
use crate::error::Result;
use crate::traits::{Embedder, IngestStore};
use crate::types::facts::{ExperimentRecord, IngestReport};

impl<S: IngestStore, E: Embedder> DocumentIngestor<S, E> {
    /// Bulk insert experiments, unique per (document, local id).
    /// Re-ingestion is a no-op for rows already present.
    #[instrument(skip_all, fields(document_id = %document_id, experiments = records.len()))]
    pub async fn ingest_experiments(
        &mut self,
        document_id: Uuid,
        records: &[ExperimentRecord],
        report: &mut IngestReport,
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        report.experiments_inserted += self
            .store
            .insert_experiments(document_id, records)
            .await?;
        Ok(())
    }
}
