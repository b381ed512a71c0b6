//! Domain types for chemical entity resolution and fact ingestion.

pub mod chemical;
pub mod config;
pub mod facts;
pub mod property;
pub mod value;

pub use chemical::{canonicalize, is_valid_inchikey, AliasMatch, ChemicalRole, Resolution};
pub use config::IngestConfig;
pub use facts::{
    AgentMention, ComponentRecord, DocumentFacts, ExperimentRecord, FormulationRecord,
    IngestReport, PropertyFact,
};
pub use property::PropertyType;
pub use value::{FactValue, ValueColumns, ValueKind, WrappedValue};
