//! Validated records handed over by the extraction passes.
//!
//! The language-model extraction itself is an external collaborator; these
//! are the shapes it returns, already schema-validated, ready for
//! resolution and normalized writes.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use uuid::Uuid;

use super::chemical::ChemicalRole;
use super::property::PropertyType;
use super::value::FactValue;

/// One chemical agent mention from the agents pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMention {
    /// InChIKey as reported by extraction. Untrusted until syntax-checked.
    #[serde(default)]
    pub inchikey: Option<String>,
    pub preferred_name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    pub role: ChemicalRole,
}

/// One intrinsic property fact from the properties pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyFact {
    #[serde(default)]
    pub agent_id: Option<String>,
    pub agent_label: String,
    pub prop_type: PropertyType,
    pub value: FactValue,
    #[serde(default)]
    pub unit: Option<String>,
    pub quote: String,
}

/// One experiment from the experiments pass. `local_id` is scoped to the
/// document (e.g. "EXPT-003").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub local_id: String,
    #[serde(default = "default_true")]
    pub performed_in_this_paper: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    /// Sample context (species, organ, dimensions, ...) kept opaque.
    #[serde(default)]
    pub biological_context: Option<Json>,
    pub quote: String,
}

fn default_true() -> bool {
    true
}

/// One role-tagged component of a formulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub role: ChemicalRole,
    pub label: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub amount: Option<FactValue>,
    #[serde(default)]
    pub unit: Option<String>,
    pub quote: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// One formulation from the formulations pass, tied to an experiment by
/// its document-scoped id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulationRecord {
    pub label: String,
    pub experiment_local_id: String,
    pub components: Vec<ComponentRecord>,
    pub quote: String,
}

/// Everything extracted from one document, as handed to the ingestor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFacts {
    #[serde(default)]
    pub agents: Vec<AgentMention>,
    #[serde(default)]
    pub properties: Vec<PropertyFact>,
    #[serde(default)]
    pub experiments: Vec<ExperimentRecord>,
    #[serde(default)]
    pub formulations: Vec<FormulationRecord>,
    /// Optional provenance link recorded on references.
    #[serde(default)]
    pub link: Option<String>,
}

/// Per-document ingestion outcome, surfaced so operators can audit
/// extraction quality. Skips are counted, never silently lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub document_id: Option<Uuid>,
    pub agents_processed: usize,
    pub properties_attached: usize,
    pub properties_skipped: usize,
    pub experiments_inserted: usize,
    pub formulations_ingested: usize,
    pub formulations_skipped: usize,
    pub components_ingested: usize,
    pub placeholders_created: usize,
    pub identifiers_quarantined: usize,
}

impl IngestReport {
    pub fn new(document_id: Uuid) -> Self {
        Self {
            document_id: Some(document_id),
            ..Default::default()
        }
    }

    /// Total facts/components skipped across all passes.
    pub fn skipped(&self) -> usize {
        self.properties_skipped + self.formulations_skipped
    }
}
