//! Intrinsic property pass: attach value + unit + quote to resolved
//! chemicals.

use tracing::{instrument, warn};
use uuid::Uuid;

use super::DocumentIngestor;
use crate::error::Result;
use crate::traits::{Embedder, IngestStore};
use crate::types::chemical::ChemicalRole;
use crate::types::facts::{IngestReport, PropertyFact};

impl<S: IngestStore, E: Embedder> DocumentIngestor<S, E> {
    /// Attach one pass worth of property facts.
    ///
    /// A unit outside the property type's allowed list, or a chemical
    /// that cannot be resolved under the configured creation policy,
    /// skips that single fact. The header stays unique per
    /// (chemical, property type); value rows are deduplicated by content;
    /// the provenance row is appended unconditionally.
    #[instrument(skip_all, fields(document_id = %document_id, facts = facts.len()))]
    pub async fn ingest_properties(
        &mut self,
        document_id: Uuid,
        facts: &[PropertyFact],
        link: Option<&str>,
        report: &mut IngestReport,
    ) -> Result<()> {
        for fact in facts {
            if let Err(err) = fact.prop_type.validate_unit(fact.unit.as_deref()) {
                warn!(label = %fact.agent_label, %err, "property skipped");
                report.properties_skipped += 1;
                continue;
            }

            let chemical_id = if self.resolver.config().create_missing_chemicals {
                let resolution = self
                    .resolver
                    .resolve(
                        &mut self.store,
                        &self.embedder,
                        fact.agent_id.as_deref(),
                        &fact.agent_label,
                        ChemicalRole::Cpa,
                        Some(document_id),
                    )
                    .await?;
                if resolution.identifier_quarantined {
                    report.identifiers_quarantined += 1;
                }
                resolution.chemical_id
            } else {
                match self
                    .resolver
                    .lookup(
                        &mut self.store,
                        &self.embedder,
                        fact.agent_id.as_deref(),
                        &fact.agent_label,
                    )
                    .await?
                {
                    Some(hit) => hit.chemical_id,
                    None => {
                        warn!(
                            label = %fact.agent_label,
                            "property skipped: chemical not found via identifier or embedding"
                        );
                        report.properties_skipped += 1;
                        continue;
                    }
                }
            };

            let property_id = self.store.ensure_property(chemical_id, fact.prop_type).await?;

            let kind = fact.value.kind();
            let columns = fact.value.columns();
            let unit = fact.unit.as_deref();
            let value_id = match self
                .store
                .find_property_value(property_id, kind, &columns, unit)
                .await?
            {
                Some(existing) => existing,
                None => {
                    self.store
                        .insert_property_value(property_id, kind, &columns, unit)
                        .await?
                }
            };

            // Always record provenance; duplicate references are tolerated.
            self.store
                .insert_reference(value_id, document_id, &fact.quote, link)
                .await?;

            report.properties_attached += 1;
        }
        Ok(())
    }
}
