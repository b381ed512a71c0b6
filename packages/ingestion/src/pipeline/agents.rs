//! Agent mention pass: seed the chemical/alias registry.

use tracing::instrument;
use uuid::Uuid;

use super::DocumentIngestor;
use crate::error::Result;
use crate::traits::{Embedder, IngestStore};
use crate::types::chemical::canonicalize;
use crate::types::facts::{AgentMention, IngestReport};

impl<S: IngestStore, E: Embedder> DocumentIngestor<S, E> {
    /// Resolve each mention and register its preferred name plus all
    /// synonyms as aliases of the resolved chemical.
    #[instrument(skip_all, fields(mentions = mentions.len()))]
    pub async fn ingest_agents(
        &mut self,
        document_id: Uuid,
        mentions: &[AgentMention],
        report: &mut IngestReport,
    ) -> Result<()> {
        for mention in mentions {
            let resolution = self
                .resolver
                .resolve(
                    &mut self.store,
                    &self.embedder,
                    mention.inchikey.as_deref(),
                    &mention.preferred_name,
                    mention.role,
                    Some(document_id),
                )
                .await?;

            for synonym in &mention.synonyms {
                let canon = canonicalize(synonym);
                let embedding = self.embedder.embed(&canon).await?;
                self.store
                    .ensure_alias(resolution.chemical_id, &canon, &embedding, false)
                    .await?;
            }

            report.agents_processed += 1;
            if resolution.identifier_quarantined {
                report.identifiers_quarantined += 1;
            }
        }
        Ok(())
    }
}
