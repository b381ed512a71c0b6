//! In-memory storage implementation for testing and development.
//!
//! Implements the full store surface against plain maps with a
//! brute-force nearest-neighbor scan. Not suitable for production; data
//! is lost on drop and the vector search is O(aliases).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as Json;
use uuid::Uuid;

use crate::error::{IngestError, Result};
use crate::traits::store::{
    ChemicalRegistry, ComponentRow, ExperimentStore, PropertyStore, StagingSink,
};
use crate::types::chemical::{AliasMatch, ChemicalRole};
use crate::types::facts::ExperimentRecord;
use crate::types::property::PropertyType;
use crate::types::value::{ValueColumns, ValueKind};

#[derive(Debug, Clone)]
pub struct ChemicalRow {
    pub inchikey: Option<String>,
    pub preferred_name: String,
    pub role: ChemicalRole,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct AliasRow {
    pub chemical_id: Uuid,
    pub text: String,
    pub embedding: Vec<f32>,
    pub is_preferred: bool,
}

#[derive(Debug, Clone)]
struct PropertyValueRow {
    property_id: Uuid,
    kind: ValueKind,
    columns: ValueColumns,
    unit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReferenceRow {
    pub property_value_id: Uuid,
    pub document_id: Uuid,
    pub quote: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuarantineRow {
    pub identifier: String,
    pub label: String,
    pub resolved_chemical: Option<Uuid>,
    pub document_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct FormulationRow {
    experiment_id: Uuid,
    label: String,
    quote: String,
}

#[derive(Debug, Clone)]
struct StoredComponent {
    formulation_id: Uuid,
    row: ComponentRow,
}

#[derive(Debug, Clone)]
struct AmountDetail {
    header: (Uuid, Uuid),
    kind: ValueKind,
    columns: ValueColumns,
    unit: Option<String>,
}

/// In-memory registry + fact store.
#[derive(Default)]
pub struct MemoryStore {
    chemicals: HashMap<Uuid, ChemicalRow>,
    aliases: Vec<(Uuid, AliasRow)>,
    properties: HashMap<(Uuid, PropertyType), Uuid>,
    property_values: Vec<(Uuid, PropertyValueRow)>,
    references: Vec<ReferenceRow>,
    experiments: HashMap<(Uuid, String), Uuid>,
    formulations: HashMap<Uuid, FormulationRow>,
    components: Vec<(Uuid, StoredComponent)>,
    amount_headers: HashMap<(Uuid, Uuid), Uuid>,
    amount_details: Vec<AmountDetail>,
    quarantine: Vec<QuarantineRow>,
    staging: HashMap<String, Vec<String>>,
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chemical_count(&self) -> usize {
        self.chemicals.len()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn property_value_count(&self) -> usize {
        self.property_values.len()
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    pub fn formulation_count(&self) -> usize {
        self.formulations.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn amount_detail_count(&self) -> usize {
        self.amount_details.len()
    }

    pub fn quarantined(&self) -> &[QuarantineRow] {
        &self.quarantine
    }

    /// Rows staged for a destination, as serialized single-line JSON.
    pub fn staged(&self, destination: &str) -> &[String] {
        self.staging
            .get(destination)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn chemical(&self, id: Uuid) -> Option<&ChemicalRow> {
        self.chemicals.get(&id)
    }

    pub fn aliases_of(&self, chemical_id: Uuid) -> Vec<&AliasRow> {
        self.aliases
            .iter()
            .filter(|(_, a)| a.chemical_id == chemical_id)
            .map(|(_, a)| a)
            .collect()
    }
}

#[async_trait]
impl ChemicalRegistry for MemoryStore {
    async fn find_chemical_by_inchikey(&mut self, inchikey: &str) -> Result<Option<Uuid>> {
        Ok(self
            .chemicals
            .iter()
            .find(|(_, c)| c.inchikey.as_deref() == Some(inchikey))
            .map(|(id, _)| *id))
    }

    async fn insert_chemical(
        &mut self,
        inchikey: Option<&str>,
        preferred_name: &str,
        role: ChemicalRole,
        embedding: &[f32],
    ) -> Result<Uuid> {
        if let Some(key) = inchikey {
            // Unique-upsert semantics on the identifier.
            let existing = self
                .chemicals
                .iter_mut()
                .find(|(_, c)| c.inchikey.as_deref() == Some(key));
            if let Some((id, row)) = existing {
                row.preferred_name = preferred_name.to_string();
                row.role = role;
                row.embedding = embedding.to_vec();
                return Ok(*id);
            }
        }
        let id = Uuid::new_v4();
        self.chemicals.insert(
            id,
            ChemicalRow {
                inchikey: inchikey.map(str::to_string),
                preferred_name: preferred_name.to_string(),
                role,
                embedding: embedding.to_vec(),
            },
        );
        Ok(id)
    }

    async fn ensure_alias(
        &mut self,
        chemical_id: Uuid,
        text: &str,
        embedding: &[f32],
        is_preferred: bool,
    ) -> Result<Uuid> {
        if let Some((id, alias)) = self
            .aliases
            .iter_mut()
            .find(|(_, a)| a.chemical_id == chemical_id && a.text == text)
        {
            alias.embedding = embedding.to_vec();
            return Ok(*id);
        }
        let id = Uuid::new_v4();
        self.aliases.push((
            id,
            AliasRow {
                chemical_id,
                text: text.to_string(),
                embedding: embedding.to_vec(),
                is_preferred,
            },
        ));
        Ok(id)
    }

    async fn find_alias_any(&mut self, text: &str) -> Result<Option<(Uuid, Uuid)>> {
        Ok(self
            .aliases
            .iter()
            .find(|(_, a)| a.text == text)
            .map(|(id, a)| (*id, a.chemical_id)))
    }

    async fn nearest_alias(&mut self, embedding: &[f32]) -> Result<Option<AliasMatch>> {
        let mut best: Option<AliasMatch> = None;
        for (id, alias) in &self.aliases {
            let distance = l2_distance(embedding, &alias.embedding);
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(AliasMatch {
                    alias_id: *id,
                    chemical_id: alias.chemical_id,
                    distance,
                });
            }
        }
        Ok(best)
    }

    async fn quarantine_identifier(
        &mut self,
        identifier: &str,
        label: &str,
        resolved_chemical: Option<Uuid>,
        document_id: Option<Uuid>,
    ) -> Result<()> {
        self.quarantine.push(QuarantineRow {
            identifier: identifier.to_string(),
            label: label.to_string(),
            resolved_chemical,
            document_id,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn ensure_property(
        &mut self,
        chemical_id: Uuid,
        prop_type: PropertyType,
    ) -> Result<Uuid> {
        Ok(*self
            .properties
            .entry((chemical_id, prop_type))
            .or_insert_with(Uuid::new_v4))
    }

    async fn find_property_value(
        &mut self,
        property_id: Uuid,
        kind: ValueKind,
        columns: &ValueColumns,
        unit: Option<&str>,
    ) -> Result<Option<Uuid>> {
        Ok(self
            .property_values
            .iter()
            .find(|(_, v)| {
                v.property_id == property_id
                    && v.kind == kind
                    && &v.columns == columns
                    && v.unit.as_deref() == unit
            })
            .map(|(id, _)| *id))
    }

    async fn insert_property_value(
        &mut self,
        property_id: Uuid,
        kind: ValueKind,
        columns: &ValueColumns,
        unit: Option<&str>,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.property_values.push((
            id,
            PropertyValueRow {
                property_id,
                kind,
                columns: columns.clone(),
                unit: unit.map(str::to_string),
            },
        ));
        Ok(id)
    }

    async fn insert_reference(
        &mut self,
        property_value_id: Uuid,
        document_id: Uuid,
        quote: &str,
        link: Option<&str>,
    ) -> Result<()> {
        self.references.push(ReferenceRow {
            property_value_id,
            document_id,
            quote: quote.to_string(),
            link: link.map(str::to_string),
        });
        Ok(())
    }
}

#[async_trait]
impl ExperimentStore for MemoryStore {
    async fn insert_experiments(
        &mut self,
        document_id: Uuid,
        experiments: &[ExperimentRecord],
    ) -> Result<usize> {
        let mut inserted = 0;
        for exp in experiments {
            let key = (document_id, exp.local_id.clone());
            if !self.experiments.contains_key(&key) {
                self.experiments.insert(key, Uuid::new_v4());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn find_experiment(
        &mut self,
        document_id: Uuid,
        local_id: &str,
    ) -> Result<Option<Uuid>> {
        Ok(self
            .experiments
            .get(&(document_id, local_id.to_string()))
            .copied())
    }

    async fn upsert_formulation(
        &mut self,
        experiment_id: Uuid,
        label: &str,
        quote: &str,
    ) -> Result<Uuid> {
        if let Some((id, f)) = self
            .formulations
            .iter_mut()
            .find(|(_, f)| f.experiment_id == experiment_id && f.label == label)
        {
            f.quote = quote.to_string();
            return Ok(*id);
        }
        let id = Uuid::new_v4();
        self.formulations.insert(
            id,
            FormulationRow {
                experiment_id,
                label: label.to_string(),
                quote: quote.to_string(),
            },
        );
        Ok(id)
    }

    async fn insert_components(
        &mut self,
        formulation_id: Uuid,
        rows: &[ComponentRow],
    ) -> Result<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let existing = self.components.iter_mut().find(|(_, c)| {
                c.formulation_id == formulation_id
                    && c.row.alias_id == row.alias_id
                    && c.row.role == row.role
            });
            match existing {
                Some((id, stored)) => {
                    stored.row = row.clone();
                    ids.push(*id);
                }
                None => {
                    let id = Uuid::new_v4();
                    self.components.push((
                        id,
                        StoredComponent {
                            formulation_id,
                            row: row.clone(),
                        },
                    ));
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    async fn record_amount_detail(
        &mut self,
        _experiment_id: Uuid,
        formulation_id: Uuid,
        component_id: Uuid,
        kind: ValueKind,
        columns: &ValueColumns,
        unit: Option<&str>,
    ) -> Result<()> {
        let header = (formulation_id, component_id);
        self.amount_headers
            .entry(header)
            .or_insert_with(Uuid::new_v4);
        let duplicate = self.amount_details.iter().any(|d| {
            d.header == header
                && d.kind == kind
                && &d.columns == columns
                && d.unit.as_deref() == unit
        });
        if !duplicate {
            self.amount_details.push(AmountDetail {
                header,
                kind,
                columns: columns.clone(),
                unit: unit.map(str::to_string),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StagingSink for MemoryStore {
    async fn load_batch(&mut self, destination: &str, rows: &[Json]) -> Result<u64> {
        if rows.is_empty() {
            return Err(IngestError::EmptyBatch {
                destination: destination.to_string(),
            });
        }
        // Serialize everything before touching the store: all rows or none.
        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            lines.push(serde_json::to_string(row)?);
        }
        let count = lines.len() as u64;
        self.staging
            .entry(destination.to_string())
            .or_default()
            .extend(lines);
        Ok(count)
    }
}
