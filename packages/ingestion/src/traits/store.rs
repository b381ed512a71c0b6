//! Storage traits for the normalized relational store.
//!
//! The storage layer is split into focused traits so tests can substitute
//! an in-memory vector index for the production Postgres/pgvector store:
//! - `ChemicalRegistry`: the shared, growing chemical/alias registry
//! - `PropertyStore`: intrinsic property headers, values, and provenance
//! - `ExperimentStore`: experiments, formulations, and components
//! - `StagingSink`: raw JSON staging ahead of normalization
//! - `IngestStore`: composite trait combining the first three
//!
//! Methods take `&mut self`: each document is processed by one logical
//! worker running strictly sequential calls, and the Postgres
//! implementation threads a per-document transaction through the session.

use async_trait::async_trait;
use serde_json::Value as Json;
use uuid::Uuid;

use crate::error::Result;
use crate::types::chemical::{AliasMatch, ChemicalRole};
use crate::types::facts::ExperimentRecord;
use crate::types::property::PropertyType;
use crate::types::value::{ValueColumns, ValueKind};

/// Component row ready for bulk insertion, after resolution.
#[derive(Debug, Clone)]
pub struct ComponentRow {
    pub role: ChemicalRole,
    pub chemical_id: Option<Uuid>,
    pub alias_id: Option<Uuid>,
    /// Scalar amount; populated only for POINT amounts.
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub quote: String,
    pub note: Option<String>,
}

/// The shared chemical/alias registry.
#[async_trait]
pub trait ChemicalRegistry: Send {
    /// Exact lookup by structured identifier.
    async fn find_chemical_by_inchikey(&mut self, inchikey: &str) -> Result<Option<Uuid>>;

    /// Insert a chemical. With an identifier this is an insert-or-update
    /// keyed on the identifier's uniqueness constraint (the concurrency
    /// defense for the exact-match path); without one it is a plain
    /// insert.
    async fn insert_chemical(
        &mut self,
        inchikey: Option<&str>,
        preferred_name: &str,
        role: ChemicalRole,
        embedding: &[f32],
    ) -> Result<Uuid>;

    /// Insert-or-refresh an alias, unique per (chemical, text). A conflict
    /// refreshes the embedding so it is always derived from the alias's
    /// own canonicalized text.
    async fn ensure_alias(
        &mut self,
        chemical_id: Uuid,
        text: &str,
        embedding: &[f32],
        is_preferred: bool,
    ) -> Result<Uuid>;

    /// Global exact alias text lookup; returns (alias_id, chemical_id).
    async fn find_alias_any(&mut self, text: &str) -> Result<Option<(Uuid, Uuid)>>;

    /// Single nearest alias across the whole registry, with its distance.
    /// Ties break on the store's underlying ordering.
    async fn nearest_alias(&mut self, embedding: &[f32]) -> Result<Option<AliasMatch>>;

    /// Record a supplied-but-unused identifier for later human review.
    async fn quarantine_identifier(
        &mut self,
        identifier: &str,
        label: &str,
        resolved_chemical: Option<Uuid>,
        document_id: Option<Uuid>,
    ) -> Result<()>;
}

/// Intrinsic property writes.
#[async_trait]
pub trait PropertyStore: Send {
    /// Insert-or-fetch the property header, unique per (chemical, type).
    async fn ensure_property(
        &mut self,
        chemical_id: Uuid,
        prop_type: PropertyType,
    ) -> Result<Uuid>;

    /// Content lookup of an existing value row, used to keep re-ingestion
    /// idempotent.
    async fn find_property_value(
        &mut self,
        property_id: Uuid,
        kind: ValueKind,
        columns: &ValueColumns,
        unit: Option<&str>,
    ) -> Result<Option<Uuid>>;

    /// Append a value row beneath a property header.
    async fn insert_property_value(
        &mut self,
        property_id: Uuid,
        kind: ValueKind,
        columns: &ValueColumns,
        unit: Option<&str>,
    ) -> Result<Uuid>;

    /// Append a provenance row. Duplicates are tolerated by design;
    /// robustness against retries beats strict uniqueness here.
    async fn insert_reference(
        &mut self,
        property_value_id: Uuid,
        document_id: Uuid,
        quote: &str,
        link: Option<&str>,
    ) -> Result<()>;
}

/// Experiments, formulations, and their components.
#[async_trait]
pub trait ExperimentStore: Send {
    /// Bulk insert, unique per (document, local id), conflicts ignored.
    /// Returns the number of rows actually inserted.
    async fn insert_experiments(
        &mut self,
        document_id: Uuid,
        experiments: &[ExperimentRecord],
    ) -> Result<usize>;

    async fn find_experiment(
        &mut self,
        document_id: Uuid,
        local_id: &str,
    ) -> Result<Option<Uuid>>;

    /// Insert-or-update keyed by (experiment, label); re-ingestion
    /// refreshes the quote instead of duplicating the header.
    async fn upsert_formulation(
        &mut self,
        experiment_id: Uuid,
        label: &str,
        quote: &str,
    ) -> Result<Uuid>;

    /// Bulk insert one formulation's components, returning generated ids
    /// aligned with the input rows. Re-inserting an existing
    /// (formulation, alias, role) row returns its existing id.
    async fn insert_components(
        &mut self,
        formulation_id: Uuid,
        rows: &[ComponentRow],
    ) -> Result<Vec<Uuid>>;

    /// Attach the auxiliary amount detail (RANGE/STRUCT amounts) to a
    /// component: an idempotent property header plus a value row.
    async fn record_amount_detail(
        &mut self,
        experiment_id: Uuid,
        formulation_id: Uuid,
        component_id: Uuid,
        kind: ValueKind,
        columns: &ValueColumns,
        unit: Option<&str>,
    ) -> Result<()>;
}

/// Bulk raw JSON loading into a staging relation.
#[async_trait]
pub trait StagingSink: Send {
    /// Load a batch atomically: all rows or none. An empty batch is a
    /// caller error, distinguishing "caller bug" from a genuinely empty
    /// result set upstream (which is a no-op the caller never forwards).
    async fn load_batch(&mut self, destination: &str, rows: &[Json]) -> Result<u64>;
}

/// Composite store used by the document ingestor.
pub trait IngestStore: ChemicalRegistry + PropertyStore + ExperimentStore {}

impl<S: ChemicalRegistry + PropertyStore + ExperimentStore> IngestStore for S {}
