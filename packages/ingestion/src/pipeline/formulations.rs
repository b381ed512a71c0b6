//! Formulation pass: compositional facts attached to experiments.

use tracing::{instrument, warn};
use uuid::Uuid;

use super::DocumentIngestor;
use crate::error::Result;
use crate::traits::store::ComponentRow;
use crate::traits::{Embedder, IngestStore};
use crate::types::chemical::{canonicalize, ChemicalRole};
use crate::types::facts::{FormulationRecord, IngestReport};
use crate::types::value::{ValueColumns, ValueKind};

impl<S: IngestStore, E: Embedder> DocumentIngestor<S, E> {
    /// Ingest one pass worth of formulations.
    ///
    /// A formulation whose experiment cannot be found is skipped with a
    /// warning; sibling formulations continue. Components are never
    /// dropped: anything the resolver cannot place gets a placeholder
    /// chemical carrying the component's role and no identifier.
    #[instrument(skip_all, fields(document_id = %document_id, formulations = records.len()))]
    pub async fn ingest_formulations(
        &mut self,
        document_id: Uuid,
        records: &[FormulationRecord],
        report: &mut IngestReport,
    ) -> Result<()> {
        for record in records {
            let Some(experiment_id) = self
                .store
                .find_experiment(document_id, &record.experiment_local_id)
                .await?
            else {
                warn!(
                    label = %record.label,
                    experiment = %record.experiment_local_id,
                    "formulation skipped: experiment not found"
                );
                report.formulations_skipped += 1;
                continue;
            };

            let formulation_id = self
                .store
                .upsert_formulation(experiment_id, &record.label, &record.quote)
                .await?;

            let mut rows: Vec<ComponentRow> = Vec::with_capacity(record.components.len());
            // (input index, kind, columns, unit) for non-scalar amounts.
            let mut aux: Vec<(usize, ValueKind, ValueColumns, Option<String>)> = Vec::new();

            for (idx, component) in record.components.iter().enumerate() {
                let (alias_id, chemical_id) = if component.role.resolves_chemically() {
                    match self
                        .resolver
                        .lookup(
                            &mut self.store,
                            &self.embedder,
                            component.agent_id.as_deref(),
                            &component.label,
                        )
                        .await?
                    {
                        Some(hit) => {
                            let alias_id = match hit.alias_id {
                                Some(alias_id) => alias_id,
                                // Exact-key hit: the label may be a new
                                // surface form for this chemical.
                                None => {
                                    let canon = canonicalize(&component.label);
                                    let embedding = self.embedder.embed(&canon).await?;
                                    self.store
                                        .ensure_alias(hit.chemical_id, &canon, &embedding, false)
                                        .await?
                                }
                            };
                            (alias_id, hit.chemical_id)
                        }
                        None => {
                            self.insert_placeholder(&component.label, component.role, report)
                                .await?
                        }
                    }
                } else {
                    self.insert_placeholder(&component.label, component.role, report)
                        .await?
                };

                let mut amount = None;
                if let Some(value) = &component.amount {
                    match value.kind() {
                        ValueKind::Point => amount = value.point(),
                        kind => {
                            aux.push((idx, kind, value.columns(), component.unit.clone()));
                        }
                    }
                }

                rows.push(ComponentRow {
                    role: component.role,
                    chemical_id: Some(chemical_id),
                    alias_id: Some(alias_id),
                    amount,
                    unit: component.unit.clone(),
                    quote: component.quote.clone(),
                    note: component.note.clone(),
                });
            }

            let component_ids = self.store.insert_components(formulation_id, &rows).await?;

            for (idx, kind, columns, unit) in aux {
                self.store
                    .record_amount_detail(
                        experiment_id,
                        formulation_id,
                        component_ids[idx],
                        kind,
                        &columns,
                        unit.as_deref(),
                    )
                    .await?;
            }

            report.formulations_ingested += 1;
            report.components_ingested += rows.len();
        }
        Ok(())
    }

    /// Ensure a stub chemical and its preferred alias exist for a label
    /// the agent pass never surfaced. Reuses a globally matching alias
    /// when one exists.
    async fn insert_placeholder(
        &mut self,
        label: &str,
        role: ChemicalRole,
        report: &mut IngestReport,
    ) -> Result<(Uuid, Uuid)> {
        let canon = canonicalize(label);
        if let Some((alias_id, chemical_id)) = self.store.find_alias_any(&canon).await? {
            return Ok((alias_id, chemical_id));
        }
        let embedding = self.embedder.embed(&canon).await?;
        let chemical_id = self
            .store
            .insert_chemical(None, label, role, &embedding)
            .await?;
        let alias_id = self
            .store
            .ensure_alias(chemical_id, &canon, &embedding, true)
            .await?;
        report.placeholders_created += 1;
        Ok((alias_id, chemical_id))
    }
}
