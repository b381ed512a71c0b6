//! End-to-end ingestion tests against the in-memory store.
//!
//! These exercise the full per-document pipeline: agent resolution,
//! property attachment, experiments, and formulations with placeholder
//! components. Every write is an idempotent upsert, so re-ingesting the
//! same document must leave row counts unchanged (only provenance
//! references accumulate).

use uuid::Uuid;

use ingestion::testing::MockEmbedder;
use ingestion::types::facts::{
    AgentMention, ComponentRecord, DocumentFacts, ExperimentRecord, FormulationRecord,
    PropertyFact,
};
use ingestion::types::value::{FactValue, WrappedValue};
use ingestion::{ChemicalRole, DocumentIngestor, IngestConfig, MemoryStore, PropertyType};

const DMSO_KEY: &str = "IAZDPXIOMUYVGZ-UHFFFAOYSA-N";
const GLYCEROL_KEY: &str = "PEDCQBHIVMGVHV-UHFFFAOYSA-N";

fn dmso_mention() -> AgentMention {
    AgentMention {
        inchikey: Some(DMSO_KEY.to_string()),
        preferred_name: "DMSO".to_string(),
        synonyms: vec!["dimethyl sulfoxide".to_string()],
        role: ChemicalRole::Cpa,
    }
}

fn glycerol_mention() -> AgentMention {
    AgentMention {
        inchikey: Some(GLYCEROL_KEY.to_string()),
        preferred_name: "Glycerol".to_string(),
        synonyms: vec![],
        role: ChemicalRole::Cpa,
    }
}

fn density_fact() -> PropertyFact {
    PropertyFact {
        agent_id: Some(DMSO_KEY.to_string()),
        agent_label: "DMSO".to_string(),
        prop_type: PropertyType::Density,
        value: FactValue::Number(1.1),
        unit: Some("g/cm3".to_string()),
        quote: "the density of DMSO is 1.1 g/cm3".to_string(),
    }
}

fn experiment(local_id: &str) -> ExperimentRecord {
    ExperimentRecord {
        local_id: local_id.to_string(),
        performed_in_this_paper: true,
        label: Some("oocyte vitrification".to_string()),
        method: Some("VITRIFICATION".to_string()),
        biological_context: None,
        quote: "oocytes were vitrified in VS55".to_string(),
    }
}

fn formulation(experiment_local_id: &str) -> FormulationRecord {
    FormulationRecord {
        label: "VS55".to_string(),
        experiment_local_id: experiment_local_id.to_string(),
        quote: "VS55 was used as the vitrification solution".to_string(),
        components: vec![
            ComponentRecord {
                role: ChemicalRole::Cpa,
                label: "DMSO".to_string(),
                agent_id: Some(DMSO_KEY.to_string()),
                amount: Some(FactValue::Number(3.1)),
                unit: Some("M".to_string()),
                quote: "3.1 M DMSO".to_string(),
                note: None,
            },
            ComponentRecord {
                role: ChemicalRole::Carrier,
                label: "EuroCollins".to_string(),
                agent_id: None,
                amount: None,
                unit: None,
                quote: "in EuroCollins solution".to_string(),
                note: None,
            },
        ],
    }
}

fn full_document() -> DocumentFacts {
    DocumentFacts {
        agents: vec![dmso_mention(), glycerol_mention()],
        properties: vec![density_fact()],
        experiments: vec![experiment("EXPT-001")],
        formulations: vec![formulation("EXPT-001")],
        link: Some("https://doi.org/10.0000/example".to_string()),
    }
}

#[tokio::test]
async fn full_document_lands_in_normalized_tables() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));
    let document_id = Uuid::new_v4();

    let report = ingestor
        .ingest_document(document_id, &full_document())
        .await
        .unwrap();

    assert_eq!(report.agents_processed, 2);
    assert_eq!(report.properties_attached, 1);
    assert_eq!(report.experiments_inserted, 1);
    assert_eq!(report.formulations_ingested, 1);
    assert_eq!(report.components_ingested, 2);
    // The carrier never appeared in the agents pass, so it lands as a
    // placeholder chemical.
    assert_eq!(report.placeholders_created, 1);
    assert_eq!(report.skipped(), 0);

    let store = ingestor.store();
    assert_eq!(store.chemical_count(), 3);
    // dmso + dimethyl sulfoxide + glycerol + eurocollins
    assert_eq!(store.alias_count(), 4);
    assert_eq!(store.property_count(), 1);
    assert_eq!(store.property_value_count(), 1);
    assert_eq!(store.reference_count(), 1);
    assert_eq!(store.experiment_count(), 1);
    assert_eq!(store.formulation_count(), 1);
    assert_eq!(store.component_count(), 2);
}

#[tokio::test]
async fn reingesting_a_document_changes_no_row_counts() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));
    let document_id = Uuid::new_v4();
    let facts = full_document();

    ingestor.ingest_document(document_id, &facts).await.unwrap();
    let report = ingestor.ingest_document(document_id, &facts).await.unwrap();

    assert_eq!(report.placeholders_created, 0);

    let store = ingestor.store();
    assert_eq!(store.chemical_count(), 3);
    assert_eq!(store.alias_count(), 4);
    assert_eq!(store.property_count(), 1);
    assert_eq!(store.property_value_count(), 1);
    assert_eq!(store.experiment_count(), 1);
    assert_eq!(store.formulation_count(), 1);
    assert_eq!(store.component_count(), 2);
    // Provenance is append-only by design: the same quote seen twice is
    // still two sightings.
    assert_eq!(store.reference_count(), 2);
}

#[tokio::test]
async fn same_identifier_across_documents_resolves_to_one_chemical() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));

    let first = DocumentFacts {
        agents: vec![dmso_mention()],
        ..Default::default()
    };
    let second = DocumentFacts {
        agents: vec![AgentMention {
            inchikey: Some(DMSO_KEY.to_string()),
            preferred_name: "Me2SO".to_string(),
            synonyms: vec![],
            role: ChemicalRole::Cpa,
        }],
        ..Default::default()
    };

    ingestor
        .ingest_document(Uuid::new_v4(), &first)
        .await
        .unwrap();
    ingestor
        .ingest_document(Uuid::new_v4(), &second)
        .await
        .unwrap();

    let store = ingestor.store();
    assert_eq!(store.chemical_count(), 1);
    // dmso, dimethyl sulfoxide, me2so
    assert_eq!(store.alias_count(), 3);
}

#[tokio::test]
async fn near_labels_reuse_the_entity_across_documents() {
    let embedder = MockEmbedder::new(2)
        .with_embedding("glycerol", vec![1.0, 0.0])
        .with_embedding("glycerin", vec![0.95, 0.05]);
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), embedder);

    let first = DocumentFacts {
        agents: vec![AgentMention {
            inchikey: None,
            preferred_name: "Glycerol".to_string(),
            synonyms: vec![],
            role: ChemicalRole::Cpa,
        }],
        ..Default::default()
    };
    let second = DocumentFacts {
        agents: vec![AgentMention {
            inchikey: None,
            preferred_name: "Glycerin".to_string(),
            synonyms: vec![],
            role: ChemicalRole::Cpa,
        }],
        ..Default::default()
    };

    ingestor
        .ingest_document(Uuid::new_v4(), &first)
        .await
        .unwrap();
    ingestor
        .ingest_document(Uuid::new_v4(), &second)
        .await
        .unwrap();

    let store = ingestor.store();
    assert_eq!(store.chemical_count(), 1);
    assert_eq!(store.alias_count(), 2);
}

#[tokio::test]
async fn case_variants_collapse_to_one_alias() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));

    let facts = DocumentFacts {
        agents: vec![
            AgentMention {
                inchikey: Some(GLYCEROL_KEY.to_string()),
                preferred_name: "Glycerol".to_string(),
                synonyms: vec![],
                role: ChemicalRole::Cpa,
            },
            AgentMention {
                inchikey: Some(GLYCEROL_KEY.to_string()),
                preferred_name: "glycerol".to_string(),
                synonyms: vec![" GLYCEROL ".to_string()],
                role: ChemicalRole::Cpa,
            },
        ],
        ..Default::default()
    };

    ingestor
        .ingest_document(Uuid::new_v4(), &facts)
        .await
        .unwrap();

    let store = ingestor.store();
    assert_eq!(store.chemical_count(), 1);
    assert_eq!(store.alias_count(), 1);
}

#[tokio::test]
async fn invalid_unit_skips_one_fact_and_keeps_siblings() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));

    let facts = DocumentFacts {
        agents: vec![dmso_mention()],
        properties: vec![
            PropertyFact {
                unit: Some("furlongs".to_string()),
                ..density_fact()
            },
            density_fact(),
        ],
        ..Default::default()
    };

    let report = ingestor
        .ingest_document(Uuid::new_v4(), &facts)
        .await
        .unwrap();

    assert_eq!(report.properties_skipped, 1);
    assert_eq!(report.properties_attached, 1);
    let store = ingestor.store();
    assert_eq!(store.property_count(), 1);
    assert_eq!(store.property_value_count(), 1);
}

#[tokio::test]
async fn property_for_unknown_chemical_is_skipped_by_default() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));

    let facts = DocumentFacts {
        properties: vec![PropertyFact {
            agent_id: None,
            agent_label: "unobtainium".to_string(),
            ..density_fact()
        }],
        ..Default::default()
    };

    let report = ingestor
        .ingest_document(Uuid::new_v4(), &facts)
        .await
        .unwrap();

    assert_eq!(report.properties_skipped, 1);
    assert_eq!(report.properties_attached, 0);
    assert_eq!(ingestor.store().chemical_count(), 0);
}

#[tokio::test]
async fn property_for_unknown_chemical_creates_entity_when_configured() {
    let config = IngestConfig::default().with_create_missing_chemicals(true);
    let mut ingestor =
        DocumentIngestor::with_config(MemoryStore::new(), MockEmbedder::new(1536), config);

    let facts = DocumentFacts {
        properties: vec![PropertyFact {
            agent_id: None,
            agent_label: "unobtainium".to_string(),
            ..density_fact()
        }],
        ..Default::default()
    };

    let report = ingestor
        .ingest_document(Uuid::new_v4(), &facts)
        .await
        .unwrap();

    assert_eq!(report.properties_attached, 1);
    assert_eq!(report.properties_skipped, 0);
    let store = ingestor.store();
    assert_eq!(store.chemical_count(), 1);
    assert_eq!(store.property_value_count(), 1);
}

#[tokio::test]
async fn duplicate_fact_across_documents_keeps_one_value_row() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));

    let facts = DocumentFacts {
        agents: vec![dmso_mention()],
        properties: vec![density_fact()],
        ..Default::default()
    };

    ingestor
        .ingest_document(Uuid::new_v4(), &facts)
        .await
        .unwrap();
    ingestor
        .ingest_document(Uuid::new_v4(), &facts)
        .await
        .unwrap();

    let store = ingestor.store();
    assert_eq!(store.property_count(), 1);
    assert_eq!(store.property_value_count(), 1);
    // One sighting per document.
    assert_eq!(store.reference_count(), 2);
}

#[tokio::test]
async fn formulation_for_missing_experiment_is_skipped() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));

    let facts = DocumentFacts {
        agents: vec![dmso_mention()],
        experiments: vec![experiment("EXPT-001")],
        formulations: vec![formulation("EXPT-999"), formulation("EXPT-001")],
        ..Default::default()
    };

    let report = ingestor
        .ingest_document(Uuid::new_v4(), &facts)
        .await
        .unwrap();

    assert_eq!(report.formulations_skipped, 1);
    assert_eq!(report.formulations_ingested, 1);
    let store = ingestor.store();
    assert_eq!(store.formulation_count(), 1);
    assert_eq!(store.component_count(), 2);
}

#[tokio::test]
async fn unresolved_cpa_component_gets_a_placeholder() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));

    let facts = DocumentFacts {
        experiments: vec![experiment("EXPT-001")],
        formulations: vec![FormulationRecord {
            label: "homebrew".to_string(),
            experiment_local_id: "EXPT-001".to_string(),
            quote: "a trehalose-only solution".to_string(),
            components: vec![ComponentRecord {
                role: ChemicalRole::Cpa,
                label: "trehalose".to_string(),
                agent_id: None,
                amount: Some(FactValue::Number(0.5)),
                unit: Some("M".to_string()),
                quote: "0.5 M trehalose".to_string(),
                note: None,
            }],
        }],
        ..Default::default()
    };

    let report = ingestor
        .ingest_document(Uuid::new_v4(), &facts)
        .await
        .unwrap();

    assert_eq!(report.placeholders_created, 1);
    assert_eq!(report.components_ingested, 1);
    let store = ingestor.store();
    assert_eq!(store.chemical_count(), 1);
    assert_eq!(store.alias_count(), 1);
}

#[tokio::test]
async fn range_amount_lands_as_amount_detail() {
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), MockEmbedder::new(1536));
    let document_id = Uuid::new_v4();

    let facts = DocumentFacts {
        agents: vec![dmso_mention()],
        experiments: vec![experiment("EXPT-001")],
        formulations: vec![FormulationRecord {
            label: "graded".to_string(),
            experiment_local_id: "EXPT-001".to_string(),
            quote: "DMSO was added stepwise".to_string(),
            components: vec![ComponentRecord {
                role: ChemicalRole::Cpa,
                label: "DMSO".to_string(),
                agent_id: Some(DMSO_KEY.to_string()),
                amount: Some(FactValue::Wrapped(WrappedValue::Range {
                    min: 1.0,
                    max: 3.0,
                })),
                unit: Some("M".to_string()),
                quote: "1-3 M DMSO".to_string(),
                note: None,
            }],
        }],
        ..Default::default()
    };

    ingestor.ingest_document(document_id, &facts).await.unwrap();
    assert_eq!(ingestor.store().amount_detail_count(), 1);

    // Re-ingesting must not duplicate the detail row.
    ingestor.ingest_document(document_id, &facts).await.unwrap();
    assert_eq!(ingestor.store().amount_detail_count(), 1);
}

#[tokio::test]
async fn hallucinated_identifier_is_quarantined_not_trusted() {
    let embedder = MockEmbedder::new(2)
        .with_embedding("glycerol", vec![1.0, 0.0])
        .with_embedding("glycerin", vec![0.95, 0.05]);
    let mut ingestor = DocumentIngestor::new(MemoryStore::new(), embedder);

    let first = DocumentFacts {
        agents: vec![AgentMention {
            inchikey: None,
            preferred_name: "glycerol".to_string(),
            synonyms: vec![],
            role: ChemicalRole::Cpa,
        }],
        ..Default::default()
    };
    // Same substance under a near name, with an identifier the store has
    // never seen. The embedding match wins and the identifier is logged.
    let second = DocumentFacts {
        agents: vec![AgentMention {
            inchikey: Some("AAAAAAAAAAAAAA-BBBBBBBBBB-C".to_string()),
            preferred_name: "glycerin".to_string(),
            synonyms: vec![],
            role: ChemicalRole::Cpa,
        }],
        ..Default::default()
    };

    ingestor
        .ingest_document(Uuid::new_v4(), &first)
        .await
        .unwrap();
    let report = ingestor
        .ingest_document(Uuid::new_v4(), &second)
        .await
        .unwrap();

    assert_eq!(report.identifiers_quarantined, 1);
    let store = ingestor.store();
    assert_eq!(store.chemical_count(), 1);
    assert_eq!(store.quarantined().len(), 1);
}
